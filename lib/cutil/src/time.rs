//! Wall-clock helpers for log lines and file naming.

use chrono::Local;

/// Formats the current local time according to the specified format string.
///
/// The format string follows the same syntax as `chrono::format::strftime`.
///
/// # Examples
///
/// ```
/// use cutil::time::local_now;
///
/// let formatted = local_now("%H:%M:%S");
/// assert_eq!(formatted.len(), 8);
/// ```
pub fn local_now(format: &str) -> String {
    Local::now().format(format).to_string()
}

/// Gets the current Unix timestamp in milliseconds.
///
/// # Examples
///
/// ```
/// use cutil::time::timestamp_millis;
///
/// assert!(timestamp_millis() > 1_600_000_000_000);
/// ```
pub fn timestamp_millis() -> i64 {
    Local::now().timestamp_millis()
}
