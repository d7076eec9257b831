//! Calendar arithmetic shared by the date filter and the derived-status
//! calculators.
//!
//! Every date inside the engine is a local calendar date ([`NaiveDate`]).
//! Timestamps are collapsed to their local date when parsed, so day counts are
//! taken midnight-to-midnight and never skew with the time of day.

use chrono::{DateTime, Datelike, Local, Months, NaiveDate, NaiveDateTime};

const NAIVE_TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Today's local calendar date.
#[must_use]
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse a loosely formatted date or timestamp into a local calendar date.
///
/// Accepts `YYYY-MM-DD`, naive timestamps with `T` or space separators, and
/// RFC 3339 timestamps with an offset (converted to the local date). Anything
/// else yields `None`; callers treat that exactly like a missing value.
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(stamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(stamp.with_timezone(&Local).date_naive());
    }

    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .map(|stamp| stamp.date())
}

/// Whole days from `today` to `target`; negative once `target` has passed.
#[must_use]
pub fn days_until(target: NaiveDate, today: NaiveDate) -> i64 {
    (target - today).num_days()
}

/// Completed years between `birth` and `today`.
///
/// One year is subtracted while today's month/day still precedes the birth
/// month/day. A birth date in the future has no age.
#[must_use]
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> Option<u32> {
    if birth > today {
        return None;
    }
    let mut years = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }
    u32::try_from(years).ok()
}

/// Add a (possibly fractional) number of years, rounded to whole months.
///
/// Month-end dates clamp (`2024-02-29` + 1 year = `2025-02-28`). Negative,
/// non-finite, or overflowing inputs yield `None`.
#[must_use]
pub fn add_years(date: NaiveDate, years: f64) -> Option<NaiveDate> {
    if !years.is_finite() || years < 0.0 {
        return None;
    }
    let months = (years * 12.0).round();
    if months > f64::from(u32::MAX) {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let months = months as u32;
    date.checked_add_months(Months::new(months))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn parses_plain_dates_and_naive_timestamps() {
        assert_eq!(parse_date("2024-03-05"), Some(d("2024-03-05")));
        assert_eq!(parse_date(" 2024-03-05 "), Some(d("2024-03-05")));
        assert_eq!(parse_date("2024-03-05T23:59:59"), Some(d("2024-03-05")));
        assert_eq!(parse_date("2024-03-05T08:15:00.250"), Some(d("2024-03-05")));
        assert_eq!(parse_date("2024-03-05 10:00:00"), Some(d("2024-03-05")));
        assert_eq!(parse_date("2024-03-05 10:00"), Some(d("2024-03-05")));
    }

    #[test]
    fn rfc3339_is_converted_to_a_local_date() {
        let parsed = parse_date("2024-06-15T12:00:00+00:00").unwrap();
        let expected = DateTime::parse_from_rfc3339("2024-06-15T12:00:00+00:00")
            .unwrap()
            .with_timezone(&Local)
            .date_naive();
        assert_eq!(parsed, expected);
    }

    #[test]
    fn garbage_is_missing() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("   "), None);
        assert_eq!(parse_date("n/a"), None);
        assert_eq!(parse_date("2024-02-30"), None);
        assert_eq!(parse_date("15/06/2024"), None);
    }

    #[test]
    fn days_until_is_signed() {
        assert_eq!(days_until(d("2024-07-11"), d("2024-07-01")), 10);
        assert_eq!(days_until(d("2024-06-21"), d("2024-07-01")), -10);
        assert_eq!(days_until(d("2024-07-01"), d("2024-07-01")), 0);
    }

    #[test]
    fn age_respects_the_birthday() {
        let today = d("2024-07-01");
        assert_eq!(age_on(d("1989-07-01"), today), Some(35));
        assert_eq!(age_on(d("1989-07-02"), today), Some(34));
        assert_eq!(age_on(d("1989-06-30"), today), Some(35));
        assert_eq!(age_on(d("2024-07-02"), today), None);
    }

    #[test]
    fn leap_day_birthdays_age_on_march_first() {
        assert_eq!(age_on(d("2000-02-29"), d("2023-02-28")), Some(22));
        assert_eq!(age_on(d("2000-02-29"), d("2023-03-01")), Some(23));
    }

    #[test]
    fn add_years_clamps_month_end() {
        assert_eq!(add_years(d("2023-01-01"), 2.0), Some(d("2025-01-01")));
        assert_eq!(add_years(d("2024-02-29"), 1.0), Some(d("2025-02-28")));
        assert_eq!(add_years(d("2024-01-31"), 0.5), Some(d("2024-07-31")));
        assert_eq!(add_years(d("2024-01-01"), -1.0), None);
        assert_eq!(add_years(d("2024-01-01"), f64::NAN), None);
    }
}
