use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::OnceLock;

/// A date exactly as an upstream producer delivered it.
///
/// Manual entry, API responses and CSV imports disagree on encodings, so the
/// raw value is kept until [`normalize`] reduces it to a calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateLike {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Timestamp(DateTime<FixedOffset>),
    /// Milliseconds since the Unix epoch, interpreted in UTC.
    EpochMillis(i64),
    Text(String),
}

impl DateLike {
    pub fn normalize(&self) -> Option<NaiveDate> {
        normalize(self)
    }

    /// Blank text is treated as an absent value when choosing between fields.
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(raw) if raw.trim().is_empty())
    }
}

impl From<NaiveDate> for DateLike {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<NaiveDateTime> for DateLike {
    fn from(value: NaiveDateTime) -> Self {
        Self::DateTime(value)
    }
}

impl From<DateTime<FixedOffset>> for DateLike {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Self::Timestamp(value)
    }
}

impl From<i64> for DateLike {
    fn from(value: i64) -> Self {
        Self::EpochMillis(value)
    }
}

impl From<&str> for DateLike {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for DateLike {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl fmt::Display for DateLike {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateLike::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            DateLike::DateTime(value) => write!(f, "{}", value.format("%Y-%m-%dT%H:%M:%S")),
            DateLike::Timestamp(value) => write!(f, "{}", value.to_rfc3339()),
            DateLike::EpochMillis(millis) => write!(f, "{millis}"),
            DateLike::Text(raw) => f.write_str(raw),
        }
    }
}

impl Serialize for DateLike {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            DateLike::EpochMillis(millis) => serializer.serialize_i64(*millis),
            other => serializer.collect_str(other),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDateLike {
    Millis(i64),
    Fractional(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for DateLike {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawDateLike::deserialize(deserializer)? {
            RawDateLike::Millis(millis) => DateLike::EpochMillis(millis),
            // `as` saturates, so out-of-range values become unparseable instants.
            RawDateLike::Fractional(millis) => DateLike::EpochMillis(millis.trunc() as i64),
            RawDateLike::Text(raw) => DateLike::Text(raw),
        })
    }
}

/// Reduce any accepted date shape to a calendar day, or `None` when unparseable.
pub fn normalize(input: &DateLike) -> Option<NaiveDate> {
    match input {
        DateLike::Date(date) => Some(*date),
        DateLike::DateTime(value) => Some(value.date()),
        DateLike::Timestamp(value) => Some(value.date_naive()),
        DateLike::EpochMillis(millis) => {
            DateTime::from_timestamp_millis(*millis).map(|instant| instant.date_naive())
        }
        DateLike::Text(raw) => parse_text(raw),
    }
}

/// String cascade: ISO-8601, then `dd/MM/yyyy`, then the generic formats.
///
/// The order is fixed; `05/09/2025` is the 5th of September even though a
/// month-first reader would accept it too.
pub fn parse_text(raw: &str) -> Option<NaiveDate> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    if value.contains('T') || value.ends_with('Z') {
        if let Some(date) = parse_iso(value) {
            return Some(date);
        }
    }

    if let Some(date) = parse_day_month_year(value) {
        return Some(date);
    }

    parse_generic(value)
}

// `%#z` takes `Z`, `+hh`, `+hhmm` and `+hh:mm`.
const ISO_OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M%#z"];

const ISO_LOCAL_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

const GENERIC_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

const GENERIC_DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

fn parse_iso(value: &str) -> Option<NaiveDate> {
    // Keep the calendar day as written in its own offset.
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Some(instant.date_naive());
    }

    if let Some(instant) = ISO_OFFSET_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(value, format).ok())
    {
        return Some(instant.date_naive());
    }

    ISO_LOCAL_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|value| value.date())
}

fn day_month_year_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\d{2})/(\d{2})/(\d{4})$").expect("dd/MM/yyyy pattern compiles")
    })
}

fn parse_day_month_year(value: &str) -> Option<NaiveDate> {
    let captures = day_month_year_pattern().captures(value)?;
    let day = captures[1].parse::<u32>().ok()?;
    let month = captures[2].parse::<u32>().ok()?;
    let year = captures[3].parse::<i32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_generic(value: &str) -> Option<NaiveDate> {
    if let Some(date) = GENERIC_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
    {
        return Some(date);
    }

    if let Some(value) = GENERIC_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
    {
        return Some(value.date());
    }

    DateTime::parse_from_rfc2822(value)
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .ok()
        .map(|instant| instant.date_naive())
}
