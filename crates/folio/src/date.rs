//! Post date parsing and display.
use chrono::DateTime;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::format::Item;
use chrono::format::StrftimeItems;
use std::fmt::Write;

/// Long English date, e.g. `October 18, 2026`.
pub const DEFAULT_DATE_FORMAT: &str = "%B %-d, %Y";

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parses a front matter date into UTC for ordering posts.
///
/// Accepts RFC 3339 timestamps, offset-less `YYYY-MM-DDTHH:MM:SS` and bare `YYYY-MM-DD`.
pub fn parse_post_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    parse_naive(raw)
}

/// Formats a post date with [`DEFAULT_DATE_FORMAT`]. Unparseable input is returned verbatim.
pub fn format_post_date(raw: &str) -> String {
    format_post_date_with(raw, DEFAULT_DATE_FORMAT)
}

/// Formats a post date with a strftime `format`.
///
/// Timestamps keep the wall-clock day they were written with, so `2024-03-01T23:30:00-05:00` is
/// still March 1.
pub fn format_post_date_with(raw: &str, format: &str) -> String {
    let trimmed = raw.trim();
    let wall = match DateTime::parse_from_rfc3339(trimmed) {
        Ok(dt) => Some(dt.naive_local()),
        Err(_) => parse_naive(trimmed),
    };
    let Some(wall) = wall else {
        return raw.to_string();
    };
    let mut out = String::new();
    match write!(out, "{}", wall.format(format)) {
        Ok(()) => out,
        Err(_) => {
            tracing::debug!(format, "invalid date format, showing raw date");
            raw.to_string()
        }
    }
}

/// Returns `true` if chrono understands every specifier in `format`.
pub fn is_valid_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

fn parse_naive(raw: &str) -> Option<NaiveDateTime> {
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
