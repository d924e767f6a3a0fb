//! Date helpers for upstream timestamps and the display timezone.

use std::time::SystemTime;
use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

pub type ServerTime = DateTime<Utc>;

/// Format used when displaying dates to users.
const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";
/// Displayed for a date that is missing entirely.
const MISSING_DATE: &str = "N/A";

pub fn get_server_time_now() -> ServerTime {
    ServerTime::from(SystemTime::now())
}

/// Parses an ISO-8601 timestamp such as `2024-05-16T15:00:00.000Z` into UTC.
pub fn parse_iso_date(date: &str) -> Option<ServerTime> {
    DateTime::parse_from_rfc3339(date.trim())
        .ok()
        .map(|date| date.with_timezone(&Utc))
}

/// Formats a date in the given timezone for display.
pub fn format_date(date: &ServerTime, timezone: &Tz) -> String {
    date.with_timezone(timezone).format(DISPLAY_FORMAT).to_string()
}

/// Formats a raw ISO-8601 timestamp in the given timezone. Dates which cannot be parsed are
/// returned as they are.
pub fn format_iso_date(date: &str, timezone: &Tz) -> String {
    if date.is_empty() {
        return MISSING_DATE.into();
    }

    match parse_iso_date(date) {
        Some(date) => format_date(&date, timezone),
        None => date.into(),
    }
}

/// Resolves a local date time in `timezone`. Ambiguous times (clocks going back) resolve to the
/// earlier instant, skipped times (clocks going forward) to the first valid instant after them.
pub fn localize(naive: NaiveDateTime, timezone: &Tz) -> ServerTime {
    let mut candidate = naive;

    // Gaps are never longer than a few hours.
    for _ in 0..(24 * 4) {
        match timezone.from_local_datetime(&candidate) {
            LocalResult::Single(date) => return date.with_timezone(&Utc),
            LocalResult::Ambiguous(earliest, _latest) => return earliest.with_timezone(&Utc),
            LocalResult::None => candidate += Duration::minutes(15),
        }
    }

    Utc.from_utc_datetime(&naive)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn parses_epic_timestamps() {
        let date = parse_iso_date("2024-05-16T15:00:00.000Z").unwrap();

        assert_eq!(date, Utc.with_ymd_and_hms(2024, 5, 16, 15, 0, 0).unwrap());
        assert!(parse_iso_date("2024-05-16T17:00:00+02:00").is_some());
        assert!(parse_iso_date("next thursday").is_none());
    }

    #[test]
    fn formats_in_display_timezone() {
        let formatted = format_iso_date("2024-05-16T15:00:00.000Z", &chrono_tz::Asia::Shanghai);

        assert_eq!(formatted, "2024-05-16 23:00");
    }

    #[test]
    fn passes_through_unparsable_dates() {
        assert_eq!(format_iso_date("soon", &chrono_tz::UTC), "soon");
        assert_eq!(format_iso_date("", &chrono_tz::UTC), "N/A");
    }

    #[test]
    fn localizes_skipped_times_forward() {
        // Clocks in New York jumped from 02:00 to 03:00 on 2024-03-10.
        let naive = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
            .and_hms_opt(2, 30, 0).unwrap();
        let date = localize(naive, &chrono_tz::America::New_York);

        assert_eq!(date, Utc.with_ymd_and_hms(2024, 3, 10, 7, 0, 0).unwrap());
    }
}
