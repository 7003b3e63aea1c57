//! File name normalization for row matching.
//!
//! Course videos are uploaded with names like `03. Intro to Agents.mp4`.
//! The spreadsheet cells carry the bare lesson title, so matching strips
//! the ordinal prefix and the extension before comparing.

use std::sync::OnceLock;

use regex::Regex;

static ORDINAL_PREFIX: OnceLock<Regex> = OnceLock::new();

fn ordinal_prefix() -> &'static Regex {
    ORDINAL_PREFIX.get_or_init(|| Regex::new(r"^\d+\.\s*").expect("valid regex literal"))
}

/// Normalize a raw file name into a matching key.
///
/// Drops the extension, strips a leading `NN. ` ordinal prefix, trims
/// whitespace, and lowercases. The result is only used as a substring
/// containment key; it carries no uniqueness guarantee.
///
/// # Examples
/// ```
/// use vidsheet_models::naming::normalize_name;
/// assert_eq!(normalize_name("03. Intro to Agents.mp4"), "intro to agents");
/// assert_eq!(normalize_name("Closing Remarks.mov"), "closing remarks");
/// ```
pub fn normalize_name(raw: &str) -> String {
    let stem = match raw.rsplit_once('.') {
        Some((stem, _ext)) if !stem.is_empty() => stem,
        _ => raw,
    };
    ordinal_prefix().replace(stem, "").trim().to_lowercase()
}
