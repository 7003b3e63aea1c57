//! Spreadsheet row matching.
//!
//! A file matches the first row (scanned top to bottom, header row
//! included) where any cell contains its normalized name as a substring.
//! Ambiguous or duplicate keys silently take the first row in sheet order.

/// Find the first row whose cells contain `needle` as a substring.
///
/// Cells are trimmed and lowercased before the containment check, so
/// `needle` is expected to already be normalized (see
/// [`crate::naming::normalize_name`]). Returns the 1-based row index, or
/// `None` when no row matches.
pub fn find_matching_row(rows: &[Vec<String>], needle: &str) -> Option<usize> {
    rows.iter()
        .position(|row| {
            row.iter()
                .any(|cell| cell.trim().to_lowercase().contains(needle))
        })
        .map(|idx| idx + 1)
}

/// Locate a column by its exact header title. Returns the 1-based index.
pub fn find_column(header: &[String], title: &str) -> Option<usize> {
    header.iter().position(|cell| cell == title).map(|idx| idx + 1)
}

/// Idempotence guard: a row is complete when both target cells hold a
/// non-empty value after trimming. Complete rows are skipped without
/// re-downloading or re-probing the video.
pub fn is_row_complete(url: Option<&str>, length: Option<&str>) -> bool {
    matches!(
        (url, length),
        (Some(u), Some(l)) if !u.trim().is_empty() && !l.trim().is_empty()
    )
}
