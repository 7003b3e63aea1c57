//! Duration formatting for the Length column.

/// Sentinel written to the Length column when download or probing fails.
pub const ERROR_MARKER: &str = "Error Reading Video";

/// Format a duration in seconds as `H:MM:SS`.
///
/// Hours are not zero-padded; minutes and seconds are. Components are
/// truncated, not rounded, so `59.9` formats as `0:00:59`.
///
/// # Examples
/// ```
/// use vidsheet_models::duration::format_duration;
/// assert_eq!(format_duration(3661.4), "1:01:01");
/// assert_eq!(format_duration(59.9), "0:00:59");
/// ```
pub fn format_duration(secs: f64) -> String {
    let total = secs.max(0.0);
    let hours = (total / 3600.0).floor() as u64;
    let minutes = ((total % 3600.0) / 60.0).floor() as u64;
    let seconds = (total % 60.0).floor() as u64;
    format!("{}:{:02}:{:02}", hours, minutes, seconds)
}
