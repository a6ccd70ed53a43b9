use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;

/// A single cell value as delivered by the read endpoint.
///
/// The wire format is loosely typed: a cell is either absent, a string, a
/// number, or a constructor-like date literal such as `Date(2025,11,12)`.
/// Classification happens once, here, when the response envelope is decoded;
/// the untyped wire form never leaves this module.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum CellValue {
    #[default]
    Empty,
    /// Plain text content
    Text(String),
    /// Numeric content (the endpoint does not distinguish int from float)
    Number(f64),
    /// Encoded date literal wrapping year, 0-based month, day and optional time
    DateLiteral(String),
}

impl CellValue {
    /// Classifies a wire string, splitting encoded date literals from plain text.
    pub fn from_text(value: String) -> Self {
        if value.starts_with("Date(") {
            Self::DateLiteral(value)
        } else {
            Self::Text(value)
        }
    }

    /// Returns true if the cell carries no content.
    ///
    /// An empty string counts as empty: the endpoint reports cleared cells
    /// either way depending on how they were cleared.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(value) => value.is_empty(),
            _ => false,
        }
    }

    /// Renders the cell as the string form used by domain records.
    ///
    /// Numbers render the way the original sheet shows them: integral values
    /// without a trailing `.0`.
    pub fn to_text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(value) | Self::DateLiteral(value) => value.clone(),
            Self::Number(value) => format!("{}", value),
        }
    }
}

/// Normalizes a date cell into the canonical `DD/MM/YYYY` form, with
/// ` HH:MM:SS` appended when the input carries a time component.
///
/// Accepted inputs, in order:
/// 1. Already-canonical values pass through unchanged.
/// 2. Encoded literals `Date(year,month,day[,hour,minute,second])` convert;
///    the literal's month is 0-based and becomes 1-based here.
/// 3. Anything else is run through generic date parsing.
///
/// A value that matches none of these is returned unchanged: one malformed
/// date must not block loading the rest of the table. The function is
/// idempotent over its own output.
pub fn normalize_date(value: &str) -> String {
    let canonical = Regex::new(r"^\d{2}/\d{2}/\d{4}( \d{2}:\d{2}:\d{2})?$")
        .expect("Hardcode regex pattern");
    if canonical.is_match(value) {
        return value.to_owned();
    }

    if let Some(normalized) = from_date_literal(value) {
        return normalized;
    }

    if let Some(normalized) = from_generic(value) {
        return normalized;
    }

    value.to_owned()
}

/// Converts an encoded `Date(...)` literal, validating the calendar fields.
/// Returns None when the literal is malformed or names an impossible date.
fn from_date_literal(value: &str) -> Option<String> {
    let literal = Regex::new(r"^Date\((\d+),(\d+),(\d+)(?:,(\d+),(\d+),(\d+))?\)$")
        .expect("Hardcode regex pattern");
    let captures = literal.captures(value)?;
    let year: i32 = captures[1].parse().ok()?;
    let month: u32 = captures[2].parse().ok()?;
    let day: u32 = captures[3].parse().ok()?;
    let date = NaiveDate::from_ymd_opt(year, month + 1, day)?;

    match captures.get(4) {
        Some(hour) => {
            let hour: u32 = hour.as_str().parse().ok()?;
            let minute: u32 = captures[5].parse().ok()?;
            let second: u32 = captures[6].parse().ok()?;
            let datetime = date.and_hms_opt(hour, minute, second)?;
            Some(datetime.format("%d/%m/%Y %H:%M:%S").to_string())
        }
        None => Some(date.format("%d/%m/%Y").to_string()),
    }
}

/// Fallback parsing for the date shapes the endpoint occasionally emits
/// instead of a literal: ISO dates, ISO datetimes, and unpadded `D/M/YYYY`.
fn from_generic(value: &str) -> Option<String> {
    const DATETIME_FORMATS: [&str; 3] = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%d/%m/%Y %H:%M:%S",
    ];
    const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];

    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, format) {
            return Some(datetime.format("%d/%m/%Y %H:%M:%S").to_string());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date.format("%d/%m/%Y").to_string());
        }
    }
    None
}
