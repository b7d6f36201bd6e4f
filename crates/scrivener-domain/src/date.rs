//! Day-first calendar date parsing
//!
//! Contracts in scope are written with European date conventions, so an
//! ambiguous `01.02.2024` is the first of February. Month-first layouts are
//! only tried after every day-first layout has failed.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

/// Layouts with a four digit year, tried in order
const FULL_YEAR_FORMATS: &[&str] = &[
    "%d.%m.%Y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d %m %Y",
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%d %B %Y",
    "%d. %B %Y",
    "%d %B, %Y",
    "%B %d %Y",
    "%B %d, %Y",
    "%Y %B %d",
    // month-first fallbacks, e.g. 12/31/2023
    "%m/%d/%Y",
    "%m.%d.%Y",
    "%m-%d-%Y",
];

/// Layouts with a two digit year
const SHORT_YEAR_FORMATS: &[&str] = &["%d.%m.%y", "%d/%m/%y", "%d-%m-%y", "%m/%d/%y"];

/// Date-time layouts; the time of day is discarded
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
];

const ORDINAL_SUFFIXES: &[&str] = &["st", "nd", "rd", "th"];

/// Parse a date string under a day-first convention
///
/// Trailing `.`/`,`, ordinal suffixes (`1st`) and a standalone `of` are
/// ignored, and a time of day after the date is dropped. Returns `None` when
/// no known layout matches.
///
/// # Examples
///
/// ```
/// use scrivener_domain::parse_day_first;
/// use chrono::NaiveDate;
///
/// assert_eq!(
///     parse_day_first("01.02.2024"),
///     NaiveDate::from_ymd_opt(2024, 2, 1)
/// );
/// assert_eq!(parse_day_first("not a date"), None);
/// ```
pub fn parse_day_first(text: &str) -> Option<NaiveDate> {
    let normalized = normalize(text);
    let trimmed = normalized.as_str();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(datetime.date_naive());
    }
    if let Some(datetime) = DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
    {
        return Some(datetime.date());
    }

    // %Y happily accepts "23" as the year 23, so short years are only
    // considered once every four digit layout has been rejected.
    for format in FULL_YEAR_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            if date.year() >= 1000 {
                return Some(date);
            }
        }
    }

    SHORT_YEAR_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}

/// Drop trailing punctuation, ordinal suffixes and a standalone "of"
fn normalize(text: &str) -> String {
    let trimmed = text.trim().trim_end_matches(['.', ',']).trim_end();

    trimmed
        .split_whitespace()
        .filter(|token| !token.eq_ignore_ascii_case("of"))
        .map(|token| {
            let core = token.trim_end_matches(',');
            let tail = &token[core.len()..];
            format!("{}{}", strip_ordinal(core), tail)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn strip_ordinal(token: &str) -> &str {
    for suffix in ORDINAL_SUFFIXES {
        if token.len() > suffix.len() && token.to_ascii_lowercase().ends_with(suffix) {
            let digits = &token[..token.len() - suffix.len()];
            if digits.chars().all(|c| c.is_ascii_digit()) {
                return digits;
            }
        }
    }
    token
}

/// Format a date the way answers are reported (DD.MM.YYYY)
pub fn format_day_first(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}
