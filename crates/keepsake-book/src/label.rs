//! Date labels.
//!
//! A photo's label is its captured date rendered as a short en-US date,
//! `"Dec 1, 2025"`. Grouping, page headers and jump-to-date all work on
//! this label rather than on the timestamp.

use chrono::{Datelike, NaiveDate};

use crate::grouper::Page;

/// Key used for photos whose label cannot be split into month and year.
pub const UNKNOWN_GROUP: &str = "Unknown";

/// Header shown on a page with no photos.
pub const EMPTY_PAGE_HEADER: &str = "Empty";

const LABEL_FORMAT: &str = "%b %-d, %Y";
const PARSE_FORMAT: &str = "%b %d, %Y";

/// Format a calendar date as a display label (`"Dec 1, 2025"`).
pub fn format_label(date: NaiveDate) -> String {
    date.format(LABEL_FORMAT).to_string()
}

/// Parse a display label back into a calendar date.
pub fn parse_label(label: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(label.trim(), PARSE_FORMAT).ok()
}

/// Month-year grouping key of a label: `"Dec 1, 2025"` becomes `"Dec 2025"`.
///
/// Labels with fewer than three space-separated parts map to
/// [`UNKNOWN_GROUP`].
pub fn month_year_key(label: &str) -> String {
    let parts: Vec<&str> = label.split(' ').collect();
    if parts.len() >= 3 {
        format!("{} {}", parts[0], parts[2])
    } else {
        UNKNOWN_GROUP.to_string()
    }
}

/// Title for a page: the month-year of its first photo, or the raw label
/// when it has no month-year.
pub fn page_header(page: &Page) -> String {
    let Some(photo) = page.first() else {
        return EMPTY_PAGE_HEADER.to_string();
    };
    let key = month_year_key(&photo.label);
    if key == UNKNOWN_GROUP && !photo.label.is_empty() {
        photo.label.clone()
    } else {
        key
    }
}

/// Sort key for a month-year group key. Unparseable keys sort last.
pub(crate) fn month_year_ordinal(key: &str) -> (i32, u32) {
    let mut parts = key.split(' ');
    let parsed = match (parts.next(), parts.next()) {
        (Some(month), Some(year)) => parse_label(&format!("{month} 1, {year}")),
        _ => None,
    };
    parsed
        .map(|date| (date.year(), date.month()))
        .unwrap_or((i32::MAX, u32::MAX))
}
