//! Date formatting for list and detail views.
//!
//! Patterns use the tokens `YYYY MM DD HH mm ss`; each token is substituted
//! once, in that order. Anything that cannot be read as a date formats as an
//! empty string so templates can bind optional timestamps directly.

#[cfg(test)]
#[path = "date_test.rs"]
mod date_test;

use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, UtcOffset};

pub const DATE: &str = "YYYY-MM-DD";
pub const DATE_TIME: &str = "YYYY-MM-DD HH:mm:ss";
pub const YEAR_MONTH: &str = "YYYY-MM";

/// Anything a caller may hand to [`format`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DateInput {
    #[default]
    Empty,
    /// Wall-clock time, used as-is.
    Local(PrimitiveDateTime),
    /// Converted to the host's local offset before formatting.
    Zoned(OffsetDateTime),
    Text(String),
    /// Milliseconds since the Unix epoch.
    TimestampMillis(i64),
}

impl From<PrimitiveDateTime> for DateInput {
    fn from(value: PrimitiveDateTime) -> Self {
        Self::Local(value)
    }
}

impl From<OffsetDateTime> for DateInput {
    fn from(value: OffsetDateTime) -> Self {
        Self::Zoned(value)
    }
}

impl From<&str> for DateInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for DateInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for DateInput {
    fn from(value: i64) -> Self {
        Self::TimestampMillis(value)
    }
}

impl<T: Into<DateInput>> From<Option<T>> for DateInput {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Empty, Into::into)
    }
}

impl DateInput {
    /// Local wall-clock reading, or `None` for empty/unparseable input.
    #[must_use]
    pub fn to_local(&self) -> Option<PrimitiveDateTime> {
        match self {
            Self::Empty | Self::TimestampMillis(0) => None,
            Self::Local(dt) => Some(*dt),
            Self::Zoned(odt) => Some(localize(*odt)),
            Self::Text(text) => parse_text(text.trim()),
            Self::TimestampMillis(ms) => OffsetDateTime::from_unix_timestamp_nanos(i128::from(*ms) * 1_000_000)
                .ok()
                .map(localize),
        }
    }
}

/// Format `input` with `pattern`.
pub fn format(input: impl Into<DateInput>, pattern: &str) -> String {
    let Some(dt) = input.into().to_local() else {
        return String::new();
    };
    pattern
        .replacen("YYYY", &dt.year().to_string(), 1)
        .replacen("MM", &pad(u8::from(dt.month())), 1)
        .replacen("DD", &pad(dt.day()), 1)
        .replacen("HH", &pad(dt.hour()), 1)
        .replacen("mm", &pad(dt.minute()), 1)
        .replacen("ss", &pad(dt.second()), 1)
}

pub fn format_date(input: impl Into<DateInput>) -> String {
    format(input, DATE)
}

pub fn format_date_time(input: impl Into<DateInput>) -> String {
    format(input, DATE_TIME)
}

pub fn format_year_month(input: impl Into<DateInput>) -> String {
    format(input, YEAR_MONTH)
}

fn pad(value: u8) -> String {
    format!("{value:02}")
}

fn localize(odt: OffsetDateTime) -> PrimitiveDateTime {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    let local = odt.to_offset(offset);
    PrimitiveDateTime::new(local.date(), local.time())
}

fn parse_text(text: &str) -> Option<PrimitiveDateTime> {
    if text.is_empty() {
        return None;
    }
    if let Ok(odt) = OffsetDateTime::parse(text, &Rfc3339) {
        return Some(localize(odt));
    }

    let date_times = [
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]"),
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
        format_description!("[year]-[month]-[day] [hour]:[minute]"),
        format_description!("[year]-[month]-[day]T[hour]:[minute]"),
        format_description!("[year]/[month]/[day] [hour]:[minute]:[second]"),
    ];
    if let Some(dt) = date_times
        .iter()
        .find_map(|fmt| PrimitiveDateTime::parse(text, *fmt).ok())
    {
        return Some(dt);
    }

    let dates = [
        format_description!("[year]-[month]-[day]"),
        format_description!("[year]/[month]/[day]"),
    ];
    dates
        .iter()
        .find_map(|fmt| Date::parse(text, *fmt).ok())
        .map(Date::midnight)
}
