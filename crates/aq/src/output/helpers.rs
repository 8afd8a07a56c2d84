//! Common helper functions for output formatting.

use album_filter_rs::Tag;
use chrono::{DateTime, Utc};

/// Date format used for display. Matches the format filter expressions use.
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

/// Truncates a string to a maximum number of characters.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        s.to_string()
    }
}

/// Formats a creation date for display.
pub fn format_date(date: DateTime<Utc>) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

/// Formats tags for display.
pub fn format_tags(tags: &[Tag], max_len: usize) -> String {
    if tags.is_empty() {
        return String::new();
    }

    let formatted: Vec<String> = tags.iter().map(|t| format!("#{}", t.name)).collect();
    let joined = formatted.join(" ");

    truncate_str(&joined, max_len)
}
