//! Display formatting for log and stats values.

#[cfg(test)]
#[path = "format_test.rs"]
mod format_test;

use time::OffsetDateTime;
use time::macros::format_description;

/// Render fractional Unix seconds as `YYYY-MM-DD HH:MM:SS` UTC.
#[must_use]
pub fn format_timestamp(secs: f64) -> String {
    #[allow(clippy::cast_possible_truncation)]
    let whole = secs.floor() as i64;
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    OffsetDateTime::from_unix_timestamp(whole)
        .ok()
        .and_then(|t| t.format(&format).ok())
        .unwrap_or_else(|| "-".to_owned())
}

#[must_use]
pub fn format_percent(value: f64) -> String {
    format!("{value:.2}%")
}

/// Long request paths are cut to `max` characters with an ellipsis.
#[must_use]
pub fn truncate_path(path: &str, max: usize) -> String {
    if path.chars().count() <= max {
        return path.to_owned();
    }
    let cut: String = path.chars().take(max.saturating_sub(1)).collect();
    format!("{cut}…")
}
