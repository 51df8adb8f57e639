use chrono::NaiveDate;
use tender_compliance::compliance::{
    index_by_day, month_grid, CalendarRecord, DateField, DayKey, DocumentImporter, RecordKind,
    GRID_DAYS,
};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

fn calendar_records() -> Vec<CalendarRecord> {
    let data = include_bytes!("../sample_documents.csv");
    let documents = DocumentImporter::from_reader(&data[..]).expect("sample documents import");

    let mut records = vec![
        CalendarRecord::new("pe-042", RecordKind::Tender)
            .with_date(DateField::SubmissionDeadline, "2025-09-19T18:00:00-03:00")
            .with_date(DateField::SessionDate, "22/09/2025"),
        CalendarRecord::new("pe-043", RecordKind::Tender)
            .with_date(DateField::SessionDate, "2025-09-10")
            .with_date(DateField::CreatedAt, "2025-08-20"),
    ];
    records.extend(documents.iter().map(CalendarRecord::from));
    records
}

#[test]
fn september_grid_holds_tenders_and_documents() {
    let records = calendar_records();
    let grid = month_grid(&records, date(2025, 9, 12));

    assert_eq!(grid.days.len(), GRID_DAYS);
    assert_eq!(grid.start(), Some(date(2025, 8, 31)));
    assert_eq!(grid.month, date(2025, 9, 1));

    // contrato-social falls back to its 2019 issue date, balanco expires in 2026.
    assert_eq!(grid.record_count(), 7);

    let tenth = grid
        .day(DayKey::from(date(2025, 9, 10)))
        .expect("september 10th is on the grid");
    let ids: Vec<&str> = tenth.records.iter().map(|record| record.id.as_str()).collect();
    assert_eq!(ids, vec!["pe-043", "cnd-federal"]);

    let nineteenth = grid
        .day(DayKey::from(date(2025, 9, 19)))
        .expect("september 19th is on the grid");
    assert_eq!(nineteenth.records.len(), 1);
    assert_eq!(nineteenth.records[0].id, "pe-042");

    let first = grid
        .day(DayKey::from(date(2025, 9, 1)))
        .expect("september 1st is on the grid");
    assert_eq!(first.records[0].id, "edital");
}

#[test]
fn index_keys_are_sorted_canonical_days() {
    let records = calendar_records();
    let index = index_by_day(&records);
    let keys: Vec<String> = index.keys().map(ToString::to_string).collect();

    assert_eq!(
        keys,
        vec![
            "2019-05-02",
            "2025-09-01",
            "2025-09-10",
            "2025-09-15",
            "2025-09-19",
            "2025-09-27",
            "2025-09-28",
            "2026-04-30",
        ]
    );
}

#[test]
fn october_grid_only_shows_overflow_days() {
    let records = calendar_records();
    let grid = month_grid(&records, date(2025, 10, 31));

    assert_eq!(grid.start(), Some(date(2025, 9, 28)));
    assert_eq!(grid.record_count(), 1);
    let cell = grid
        .day(DayKey::from(date(2025, 9, 28)))
        .expect("leading september day");
    assert!(!cell.in_month);
    assert_eq!(cell.records[0].id, "estadual");
}
