use chrono::{Datelike, NaiveDate, TimeZone, Utc};
use taskboard::utils::datetime::*;

#[test]
fn test_parse_rfc3339_with_zulu() {
    let parsed = parse_remote_timestamp("2024-02-01T09:30:00.000Z").unwrap();
    assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 2, 1, 9, 30, 0).unwrap());
}

#[test]
fn test_parse_rfc3339_with_offset() {
    let parsed = parse_remote_timestamp("2024-02-01T09:30:00+09:00").unwrap();
    assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 2, 1, 0, 30, 0).unwrap());
}

#[test]
fn test_parse_naive_as_utc() {
    let expected = Utc.with_ymd_and_hms(2024, 2, 1, 9, 30, 0).unwrap();
    assert_eq!(parse_remote_timestamp("2024-02-01T09:30:00"), Some(expected));
    assert_eq!(parse_remote_timestamp("2024-02-01T09:30:00.000"), Some(expected));
    assert_eq!(parse_remote_timestamp("2024-02-01 09:30:00"), Some(expected));
}

#[test]
fn test_parse_rejects_garbage() {
    assert_eq!(parse_remote_timestamp(""), None);
    assert_eq!(parse_remote_timestamp("   "), None);
    assert_eq!(parse_remote_timestamp("not a date"), None);
    assert_eq!(parse_remote_timestamp("2024-13-45T99:00:00Z"), None);
}

#[test]
fn test_format_human_date_relative_days() {
    let today = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(); // Wednesday

    assert_eq!(format_human_date(today, today), "today");
    assert_eq!(format_human_date(today.pred_opt().unwrap(), today), "yesterday");
    assert_eq!(format_human_date(today.succ_opt().unwrap(), today), "tomorrow");

    let monday = NaiveDate::from_ymd_opt(2025, 1, 13).unwrap();
    assert_eq!(format_human_date(monday, today), "last Monday");

    let two_weeks_ago = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    assert_eq!(format_human_date(two_weeks_ago, today), "14 days ago");
}

#[test]
fn test_format_human_date_far_dates() {
    let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();

    let same_year = NaiveDate::from_ymd_opt(2025, 2, 3).unwrap();
    assert_eq!(format_human_date(same_year, today), "Feb 03");

    let last_year = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
    assert_eq!(last_year.year(), 2024);
    assert_eq!(format_human_date(last_year, today), "Dec 01, 2024");
}

#[test]
fn test_format_completed_at_has_time() {
    let label = format_completed_at(&Utc::now());
    assert!(label.starts_with("today at "), "unexpected label: {label}");
}
