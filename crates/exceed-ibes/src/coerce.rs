//! Coercion of untyped export cells into typed values.
//!
//! The summary exports carry dates as ISO strings, compact `YYYYMMDD`
//! strings, US-style strings or raw epoch numbers, and times either as
//! `HH:MM:SS` or as epoch seconds. Every parser returns `None` when the
//! cell cannot be read; [`is_null`] decides which cells are missing.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

const SECONDS_PER_DAY: i64 = 86_400;

/// Epoch values at or above this magnitude are read as milliseconds.
const MILLIS_THRESHOLD: f64 = 1e11;

/// Whether a cell represents a missing value.
pub fn is_null(raw: &str) -> bool {
    let s = raw.trim();
    s.is_empty()
        || ["na", "nan", "nat", "null", "none"]
            .iter()
            .any(|n| s.eq_ignore_ascii_case(n))
}

/// Parse a calendar date.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use exceed_ibes::coerce::parse_date;
///
/// let expected = NaiveDate::from_ymd_opt(2020, 3, 31);
/// assert_eq!(parse_date("2020-03-31"), expected);
/// assert_eq!(parse_date("20200331"), expected);
/// assert_eq!(parse_date("1585612800"), expected);
/// ```
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();

    if s.len() == 8
        && s.bytes().all(|b| b.is_ascii_digit())
        && let Ok(d) = NaiveDate::parse_from_str(s, "%Y%m%d")
    {
        return Some(d);
    }

    for fmt in ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }

    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    s.parse::<f64>().ok().and_then(date_from_epoch)
}

/// Calendar date of an epoch timestamp in seconds or milliseconds.
pub fn date_from_epoch(value: f64) -> Option<NaiveDate> {
    let secs = epoch_seconds(value)?;
    DateTime::from_timestamp(secs, 0).map(|dt| dt.date_naive())
}

/// Parse a wall-clock time.
///
/// Numeric cells are epoch seconds; only the time of day is kept.
///
/// # Examples
///
/// ```
/// use chrono::NaiveTime;
/// use exceed_ibes::coerce::parse_time;
///
/// let expected = NaiveTime::from_hms_opt(16, 5, 0);
/// assert_eq!(parse_time("16:05:00"), expected);
/// assert_eq!(parse_time("57900"), expected);
/// ```
pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    let s = raw.trim();

    for fmt in ["%H:%M:%S", "%H:%M:%S%.f", "%H:%M"] {
        if let Ok(t) = NaiveTime::parse_from_str(s, fmt) {
            return Some(t);
        }
    }

    let secs = epoch_seconds(s.parse::<f64>().ok()?)?;
    let of_day = secs.rem_euclid(SECONDS_PER_DAY);
    NaiveTime::from_num_seconds_from_midnight_opt(u32::try_from(of_day).ok()?, 0)
}

/// Parse a floating point number.
pub fn parse_f64(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a non-negative count, accepting float notation such as `"12.0"`.
pub fn parse_count(raw: &str) -> Option<u32> {
    let s = raw.trim();
    if let Ok(n) = s.parse::<u32>() {
        return Some(n);
    }
    let v = s.parse::<f64>().ok()?;
    if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= f64::from(u32::MAX) {
        Some(v as u32)
    } else {
        None
    }
}

fn epoch_seconds(value: f64) -> Option<i64> {
    if !value.is_finite() {
        return None;
    }
    let secs = if value.abs() >= MILLIS_THRESHOLD {
        value / 1000.0
    } else {
        value
    };
    Some(secs.floor() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case("1996-12-31")]
    #[case("19961231")]
    #[case("12/31/1996")]
    #[case("1996/12/31")]
    #[case("1996-12-31 00:00:00")]
    #[case("1996-12-31T00:00:00")]
    #[case(" 1996-12-31 ")]
    #[case("851990400")]
    #[case("851990400000")]
    #[case("851990400.0")]
    fn test_parse_date_formats(#[case] raw: &str) {
        assert_eq!(parse_date(raw), Some(ymd(1996, 12, 31)));
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date("2021-02-30"), None);
    }

    #[rstest]
    #[case("", true)]
    #[case("  ", true)]
    #[case("NA", true)]
    #[case("NaN", true)]
    #[case("NaT", true)]
    #[case("null", true)]
    #[case("0", false)]
    #[case("ABC", false)]
    fn test_is_null(#[case] raw: &str, #[case] expected: bool) {
        assert_eq!(is_null(raw), expected);
    }

    #[test]
    fn test_parse_time_from_epoch_keeps_time_of_day() {
        // 1996-12-31 16:30:15 UTC
        let secs = 851_990_400 + 16 * 3600 + 30 * 60 + 15;
        assert_eq!(
            parse_time(&secs.to_string()),
            NaiveTime::from_hms_opt(16, 30, 15)
        );
    }

    #[test]
    fn test_parse_time_hh_mm() {
        assert_eq!(parse_time("08:30"), NaiveTime::from_hms_opt(8, 30, 0));
        assert_eq!(parse_time("later"), None);
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("12"), Some(12));
        assert_eq!(parse_count("12.0"), Some(12));
        assert_eq!(parse_count("12.5"), None);
        assert_eq!(parse_count("-1"), None);
    }

    #[test]
    fn test_parse_f64() {
        assert_eq!(parse_f64(" 1.25 "), Some(1.25));
        assert_eq!(parse_f64("inf"), None);
        assert_eq!(parse_f64("x"), None);
    }
}
