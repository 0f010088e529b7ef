//! Date and time utility functions
//!
//! Remote task records carry RFC 3339 timestamps (`2024-02-01T09:30:00.000Z`).
//! Parsing here never fails loudly: anything unparsable becomes `None` and
//! callers decide what "no timestamp" means for them.

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, Utc, Weekday};

/// Date format used for display and in generated config headers
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a remote timestamp into UTC.
///
/// Accepts RFC 3339 with an offset or a trailing `Z`, and ISO 8601 without a
/// zone (interpreted as UTC). Returns `None` for anything else.
pub fn parse_remote_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
}

/// Format a completion time as a short human label, e.g. "today at 14:30".
pub fn format_completed_at(completed_at: &DateTime<Utc>) -> String {
    let local = completed_at.with_timezone(&Local);
    let date = format_human_date(local.date_naive(), Local::now().date_naive());
    format!("{} at {}", date, local.format("%H:%M"))
}

/// Format `date` relative to `today` ("yesterday", "last Monday", "Jan 15").
pub fn format_human_date(date: NaiveDate, today: NaiveDate) -> String {
    let days_diff = (date - today).num_days();

    match days_diff {
        -1 => "yesterday".to_string(),
        0 => "today".to_string(),
        1 => "tomorrow".to_string(),
        diff if (-7..-1).contains(&diff) => format!("last {}", weekday_name(date.weekday())),
        diff if (-30..-7).contains(&diff) => format!("{} days ago", -diff),
        _ => {
            if date.year() == today.year() {
                date.format("%b %d").to_string()
            } else {
                date.format("%b %d, %Y").to_string()
            }
        }
    }
}

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
