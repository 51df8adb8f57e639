use super::dates::DateLike;
use super::domain::ComplianceDocument;
use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Cells in a month view: six full weeks.
pub const GRID_DAYS: usize = 42;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateField {
    SubmissionDeadline,
    SessionDate,
    CreatedAt,
    ExpiresAt,
    IssueDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Tender,
    Document,
}

impl RecordKind {
    /// Fields consulted, in order, when placing a record on the calendar.
    pub const fn date_priority(self) -> &'static [DateField] {
        match self {
            Self::Tender => &[
                DateField::SubmissionDeadline,
                DateField::SessionDate,
                DateField::CreatedAt,
            ],
            Self::Document => &[
                DateField::ExpiresAt,
                DateField::IssueDate,
                DateField::CreatedAt,
            ],
        }
    }
}

/// Anything that can be placed on the calendar.
pub trait Dated {
    fn record_id(&self) -> &str;
    fn kind(&self) -> RecordKind;
    fn date_field(&self, field: DateField) -> Option<&DateLike>;
}

/// Generic calendar entry for tenders and documents coming from the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarRecord {
    pub id: String,
    pub kind: RecordKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub dates: BTreeMap<DateField, DateLike>,
}

impl CalendarRecord {
    pub fn new(id: impl Into<String>, kind: RecordKind) -> Self {
        Self {
            id: id.into(),
            kind,
            title: None,
            dates: BTreeMap::new(),
        }
    }

    pub fn with_date(mut self, field: DateField, value: impl Into<DateLike>) -> Self {
        self.dates.insert(field, value.into());
        self
    }
}

impl From<&ComplianceDocument> for CalendarRecord {
    fn from(document: &ComplianceDocument) -> Self {
        let mut record = Self::new(document.id.0.clone(), RecordKind::Document);
        record.title = document.name.clone();
        for field in RecordKind::Document.date_priority() {
            if let Some(value) = document.date_field(*field) {
                record.dates.insert(*field, value.clone());
            }
        }
        record
    }
}

impl Dated for CalendarRecord {
    fn record_id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> RecordKind {
        self.kind
    }

    fn date_field(&self, field: DateField) -> Option<&DateLike> {
        self.dates.get(&field)
    }
}

impl Dated for ComplianceDocument {
    fn record_id(&self) -> &str {
        &self.id.0
    }

    fn kind(&self) -> RecordKind {
        RecordKind::Document
    }

    fn date_field(&self, field: DateField) -> Option<&DateLike> {
        match field {
            DateField::ExpiresAt => self.expires_at.as_ref(),
            DateField::IssueDate => self.issue_date.as_ref(),
            _ => None,
        }
    }
}

/// Canonical `YYYY-MM-DD` key of a calendar cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DayKey(NaiveDate);

impl DayKey {
    pub fn date(self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for DayKey {
    fn from(value: NaiveDate) -> Self {
        Self(value)
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl Serialize for DayKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Pick the first populated field in the kind's priority list and normalize it.
///
/// Only the first populated field is considered: if it does not parse, the
/// record has no calendar date.
pub fn select_date<R: Dated + ?Sized>(record: &R) -> Option<NaiveDate> {
    let (field, value) = record
        .kind()
        .date_priority()
        .iter()
        .find_map(|field| {
            record
                .date_field(*field)
                .filter(|value| !value.is_blank())
                .map(|value| (*field, value))
        })?;

    let date = value.normalize();
    if date.is_none() {
        debug!(
            record = record.record_id(),
            ?field,
            raw = %value,
            "skipping record with unparseable calendar date"
        );
    }
    date
}

/// Bucket records by calendar day, preserving input order inside a bucket.
pub fn index_by_day<R: Dated>(records: &[R]) -> BTreeMap<DayKey, Vec<&R>> {
    let mut index: BTreeMap<DayKey, Vec<&R>> = BTreeMap::new();
    for record in records {
        if let Some(date) = select_date(record) {
            index.entry(DayKey(date)).or_default().push(record);
        }
    }
    index
}

#[derive(Debug, Serialize)]
pub struct CalendarDay<'a, R> {
    pub key: DayKey,
    pub in_month: bool,
    pub records: Vec<&'a R>,
}

#[derive(Debug, Serialize)]
pub struct CalendarGrid<'a, R> {
    /// First day of the displayed month.
    pub month: NaiveDate,
    pub days: Vec<CalendarDay<'a, R>>,
}

impl<'a, R> CalendarGrid<'a, R> {
    pub fn start(&self) -> Option<NaiveDate> {
        self.days.first().map(|day| day.key.date())
    }

    pub fn day(&self, key: DayKey) -> Option<&CalendarDay<'a, R>> {
        self.days.iter().find(|day| day.key == key)
    }

    pub fn record_count(&self) -> usize {
        self.days.iter().map(|day| day.records.len()).sum()
    }
}

/// Lay records out on the six-week grid that contains `month_anchor`'s month,
/// starting on the Sunday on or before the first of the month.
pub fn month_grid<R: Dated>(records: &[R], month_anchor: NaiveDate) -> CalendarGrid<'_, R> {
    let month = month_anchor.with_day(1).unwrap_or(month_anchor);
    let lead = u64::from(month.weekday().num_days_from_sunday());
    let start = month.checked_sub_days(Days::new(lead)).unwrap_or(month);

    let mut index = index_by_day(records);
    let days = start
        .iter_days()
        .take(GRID_DAYS)
        .map(|date| {
            let key = DayKey(date);
            CalendarDay {
                key,
                in_month: date.year() == month.year() && date.month() == month.month(),
                records: index.remove(&key).unwrap_or_default(),
            }
        })
        .collect();

    CalendarGrid { month, days }
}
