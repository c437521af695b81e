//! Text helpers for rendering backend content.

use chrono::{DateTime, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid tag regex"));
static SPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid space regex"));

/// Replace HTML tags with spaces and collapse whitespace.
#[must_use]
pub fn strip_html_tags(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }
    let without_tags = TAG_RE.replace_all(html, " ");
    SPACE_RE.replace_all(&without_tags, " ").trim().to_string()
}

/// Format a backend timestamp as `27 May 2025`.
///
/// Accepts RFC 3339 timestamps and bare `YYYY-MM-DD` dates; anything else
/// is returned unchanged.
#[must_use]
pub fn format_date(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%d %b %Y").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%d %b %Y").to_string();
    }
    raw.to_string()
}

/// Truncate to at most `max_chars` characters, appending an ellipsis.
#[must_use]
pub fn excerpt(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.truncate(out.trim_end().len());
    out.push('\u{2026}');
    out
}
