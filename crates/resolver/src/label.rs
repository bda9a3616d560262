use crate::error::LookupError;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use crumbtrail_protocol::{FLIGHTS_SEGMENT, PAYLOADS_SEGMENT};

const FLIGHT_LABEL_FORMAT: &str = "%b %-d, %Y, %I:%M %p";

const NAIVE_TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Fixed labels for the collection segments; these win over any other rule.
#[must_use]
pub fn fixed_label(segment: &str) -> Option<&'static str> {
    match segment {
        PAYLOADS_SEGMENT => Some("Payloads"),
        FLIGHTS_SEGMENT => Some("Flights"),
        _ => None,
    }
}

/// Hyphens become spaces and each word gets an upper-cased first character;
/// the rest of the word is left untouched.
#[must_use]
pub fn format_segment(segment: &str) -> String {
    segment
        .split('-')
        .map(capitalize_first)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Short en-US date-time, e.g. `Mar 5, 2024, 02:30 PM`.
///
/// Timestamps carrying an offset are shown in local time; naive timestamps
/// (what the flights API emits) are shown as written.
pub fn format_flight_date(raw: &str) -> Result<String, LookupError> {
    let raw = raw.trim();
    let local = parse_flight_date(raw)
        .ok_or_else(|| LookupError::InvalidTimestamp(raw.to_string()))?;
    Ok(local.format(FLIGHT_LABEL_FORMAT).to_string())
}

fn parse_flight_date(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Some(with_offset.with_timezone(&Local).naive_local());
    }
    for format in NAIVE_TIMESTAMP_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}
