//! Polars AnyValue utility functions.
//!
//! This module provides helper functions for working with Polars `AnyValue` types,
//! including string conversions, boolean/date coercion and numeric parsing.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::*;

/// Days between 0001-01-01 (CE day 1) and the Unix epoch.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Layouts carrying a UTC offset; parsed values are normalized to UTC.
const OFFSET_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M:%S%.f%#z",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d", "%Y%m%d"];

/// Returns the value stored at `idx` in column `name`, or `Null` when the
/// column or row does not exist.
pub fn column_value<'a>(df: &'a DataFrame, name: &str, idx: usize) -> AnyValue<'a> {
    match df.column(name) {
        Ok(column) => column.get(idx).unwrap_or(AnyValue::Null),
        Err(_) => AnyValue::Null,
    }
}

/// Converts a Polars `AnyValue` to a `String` representation.
///
/// Returns an empty string for `Null`, properly formats numeric types without
/// unnecessary trailing zeros.
///
/// # Examples
///
/// ```
/// use polars::prelude::AnyValue;
/// use fiscal_common::any_to_string;
///
/// assert_eq!(any_to_string(AnyValue::Null), "");
/// assert_eq!(any_to_string(AnyValue::Int32(42)), "42");
/// assert_eq!(any_to_string(AnyValue::Float64(900123.0)), "900123");
/// assert_eq!(any_to_string(AnyValue::String("hello")), "hello");
/// ```
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Converts `AnyValue` to `String`, returning `None` if the trimmed result is empty.
pub fn any_to_string_non_empty(value: AnyValue<'_>) -> Option<String> {
    let s = any_to_string(value);
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Formats a floating-point number as a string without trailing zeros.
///
/// # Examples
///
/// ```
/// use fiscal_common::format_numeric;
///
/// assert_eq!(format_numeric(1.0), "1");
/// assert_eq!(format_numeric(1.5), "1.5");
/// assert_eq!(format_numeric(100.0), "100");
/// assert_eq!(format_numeric(0.0), "0");
/// ```
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if !s.contains('.') {
        return s;
    }
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Converts an `AnyValue` to `f64`, returning `None` for non-numeric or null values.
pub fn any_to_f64(value: AnyValue<'_>) -> Option<f64> {
    match value {
        AnyValue::Null => None,
        AnyValue::Int8(v) => Some(f64::from(v)),
        AnyValue::Int16(v) => Some(f64::from(v)),
        AnyValue::Int32(v) => Some(f64::from(v)),
        AnyValue::Int64(v) => Some(v as f64),
        AnyValue::UInt8(v) => Some(f64::from(v)),
        AnyValue::UInt16(v) => Some(f64::from(v)),
        AnyValue::UInt32(v) => Some(f64::from(v)),
        AnyValue::UInt64(v) => Some(v as f64),
        AnyValue::Float32(v) => Some(f64::from(v)),
        AnyValue::Float64(v) => Some(v),
        AnyValue::String(s) => parse_f64(s),
        AnyValue::StringOwned(s) => parse_f64(&s),
        _ => None,
    }
}

/// Converts an `AnyValue` to `i64`, returning `None` for null, non-numeric,
/// or fractional values.
///
/// Whole floats (`2020.0`) and numeric text (`"2020"`, `"2020.0"`) are accepted.
pub fn any_to_i64(value: AnyValue<'_>) -> Option<i64> {
    match value {
        AnyValue::Null => None,
        AnyValue::Int8(v) => Some(i64::from(v)),
        AnyValue::Int16(v) => Some(i64::from(v)),
        AnyValue::Int32(v) => Some(i64::from(v)),
        AnyValue::Int64(v) => Some(v),
        AnyValue::UInt8(v) => Some(i64::from(v)),
        AnyValue::UInt16(v) => Some(i64::from(v)),
        AnyValue::UInt32(v) => Some(i64::from(v)),
        AnyValue::UInt64(v) => i64::try_from(v).ok(),
        AnyValue::Float32(v) => whole_f64_to_i64(f64::from(v)),
        AnyValue::Float64(v) => whole_f64_to_i64(v),
        AnyValue::String(s) => parse_i64(s),
        AnyValue::StringOwned(s) => parse_i64(&s),
        _ => None,
    }
}

fn whole_f64_to_i64(v: f64) -> Option<i64> {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 9.0e15 {
        Some(v as i64)
    } else {
        None
    }
}

/// Interprets an `AnyValue` as a boolean flag.
///
/// Booleans pass through, numbers are true when non-zero, and text accepts
/// `true`/`t`/`yes`/`y`/`1` and `false`/`f`/`no`/`n`/`0` (case-insensitive).
/// Anything else, including null, is `None`.
pub fn any_to_bool(value: AnyValue<'_>) -> Option<bool> {
    match value {
        AnyValue::Null => None,
        AnyValue::Boolean(b) => Some(b),
        AnyValue::String(s) => parse_bool(s),
        AnyValue::StringOwned(s) => parse_bool(&s),
        other => any_to_f64(other).map(|v| v != 0.0),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "1" => Some(true),
        "false" | "f" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}

/// Converts an `AnyValue` to a naive timestamp.
///
/// Handles Polars `Date`/`Datetime` values, `yyyymmdd` integers and the
/// text layouts accepted by [`parse_datetime`].
pub fn any_to_datetime(value: AnyValue<'_>) -> Option<NaiveDateTime> {
    match value {
        AnyValue::Null => None,
        AnyValue::Date(days) => days
            .checked_add(UNIX_EPOCH_DAYS_FROM_CE)
            .and_then(NaiveDate::from_num_days_from_ce_opt)
            .and_then(|date| date.and_hms_opt(0, 0, 0)),
        AnyValue::Datetime(v, unit, _) | AnyValue::DatetimeOwned(v, unit, _) => {
            let timestamp = match unit {
                TimeUnit::Milliseconds => DateTime::from_timestamp_millis(v),
                TimeUnit::Microseconds => DateTime::from_timestamp_micros(v),
                TimeUnit::Nanoseconds => Some(DateTime::from_timestamp_nanos(v)),
            };
            timestamp.map(|ts| ts.naive_utc())
        }
        AnyValue::String(s) => parse_datetime(s),
        AnyValue::StringOwned(s) => parse_datetime(&s),
        other => any_to_i64(other).and_then(|v| parse_datetime(&v.to_string())),
    }
}

/// Parses a date or timestamp string, returning `None` when no known layout matches.
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.naive_utc());
    }
    for format in OFFSET_DATETIME_FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(trimmed, format) {
            return Some(parsed.naive_utc());
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(parsed);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(trimmed, format) {
            return parsed.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Parses a string as `f64`, returning `None` for invalid or empty strings.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Parses a string as `i64`, returning `None` for invalid, fractional or empty strings.
pub fn parse_i64(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .parse::<i64>()
        .ok()
        .or_else(|| trimmed.parse::<f64>().ok().and_then(whole_f64_to_i64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_timestamps_are_normalized_to_utc() {
        let expected = NaiveDate::from_ymd_opt(2023, 7, 15).and_then(|d| d.and_hms_opt(0, 0, 0));
        assert_eq!(parse_datetime("2023-07-15T00:00:00.000Z"), expected);
        assert_eq!(parse_datetime("2023-07-15T00:00:00+00:00"), expected);
        assert_eq!(parse_datetime("2023-07-15 05:00:00.000+05:00"), expected);
        assert_eq!(parse_datetime("2023-07-14T19:00:00-0500"), expected);
        assert!(
            parse_datetime("2023-07-15T00:00:00.000Z") > parse_datetime("2021-01-01T00:00:00.000Z")
        );
    }

    #[test]
    fn test_any_to_string_null() {
        assert_eq!(any_to_string(AnyValue::Null), "");
    }

    #[test]
    fn test_any_to_string_integers() {
        assert_eq!(any_to_string(AnyValue::Int32(42)), "42");
        assert_eq!(any_to_string(AnyValue::Int64(-100)), "-100");
        assert_eq!(any_to_string(AnyValue::UInt32(0)), "0");
    }

    #[test]
    fn test_any_to_string_floats() {
        assert_eq!(any_to_string(AnyValue::Float64(1.5)), "1.5");
        assert_eq!(any_to_string(AnyValue::Float64(1.0)), "1");
        assert_eq!(any_to_string(AnyValue::Float64(800200.0)), "800200");
    }

    #[test]
    fn test_any_to_string_boolean() {
        assert_eq!(any_to_string(AnyValue::Boolean(true)), "true");
        assert_eq!(any_to_string(AnyValue::Boolean(false)), "false");
    }

    #[test]
    fn test_any_to_string_non_empty() {
        assert_eq!(any_to_string_non_empty(AnyValue::Null), None);
        assert_eq!(any_to_string_non_empty(AnyValue::String("  ")), None);
        assert_eq!(
            any_to_string_non_empty(AnyValue::String(" 900 ")),
            Some("900".to_string())
        );
    }

    #[test]
    fn test_format_numeric() {
        assert_eq!(format_numeric(1.0), "1");
        assert_eq!(format_numeric(10.0), "10");
        assert_eq!(format_numeric(1.50), "1.5");
        assert_eq!(format_numeric(0.0), "0");
        assert_eq!(format_numeric(-0.0), "0");
    }

    #[test]
    fn test_any_to_i64() {
        assert_eq!(any_to_i64(AnyValue::Null), None);
        assert_eq!(any_to_i64(AnyValue::Int32(42)), Some(42));
        assert_eq!(any_to_i64(AnyValue::Float64(2020.0)), Some(2020));
        assert_eq!(any_to_i64(AnyValue::Float64(3.9)), None);
        assert_eq!(any_to_i64(AnyValue::String("2020.0")), Some(2020));
        assert_eq!(any_to_i64(AnyValue::String("Vigente")), None);
    }

    #[test]
    fn test_any_to_bool() {
        assert_eq!(any_to_bool(AnyValue::Boolean(true)), Some(true));
        assert_eq!(any_to_bool(AnyValue::Int64(1)), Some(true));
        assert_eq!(any_to_bool(AnyValue::Int32(0)), Some(false));
        assert_eq!(any_to_bool(AnyValue::String("TRUE")), Some(true));
        assert_eq!(any_to_bool(AnyValue::String("0")), Some(false));
        assert_eq!(any_to_bool(AnyValue::String("maybe")), None);
        assert_eq!(any_to_bool(AnyValue::Null), None);
    }

    #[test]
    fn test_any_to_datetime_from_date() {
        // 2024-01-15 is 19737 days after the epoch.
        let parsed = any_to_datetime(AnyValue::Date(19_737)).unwrap();
        assert_eq!(parsed.date(), NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    }

    #[test]
    fn test_parse_datetime_layouts() {
        let expected = NaiveDate::from_ymd_opt(2023, 5, 2)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(parse_datetime("2023-05-02"), Some(expected));
        assert_eq!(parse_datetime("02/05/2023"), Some(expected));
        assert_eq!(parse_datetime("20230502"), Some(expected));
        assert!(parse_datetime("2023-05-02 10:30:00") > Some(expected));
        assert_eq!(parse_datetime("yesterday"), None);
        assert_eq!(parse_datetime(""), None);
    }

    #[test]
    fn test_any_to_datetime_from_integer() {
        let parsed = any_to_datetime(AnyValue::Int64(20230502)).unwrap();
        assert_eq!(parsed.date(), NaiveDate::from_ymd_opt(2023, 5, 2).unwrap());
    }

    #[test]
    fn test_column_value_missing_column() {
        let df = DataFrame::new(vec![
            Series::new("A".into(), vec!["x"]).into_column(),
        ])
        .unwrap();
        assert_eq!(any_to_string(column_value(&df, "A", 0)), "x");
        assert_eq!(column_value(&df, "B", 0), AnyValue::Null);
        assert_eq!(column_value(&df, "A", 5), AnyValue::Null);
    }
}
