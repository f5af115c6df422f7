//! Timestamp normalizer — folds numbers, numeric strings, and date strings
//! into epoch milliseconds.
//!
//! Normalization never fails. Input that cannot be interpreted degrades to
//! the current wall-clock time.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

/// Values below this are second-resolution epochs; at or above it they are
/// already milliseconds.
pub const SECONDS_THRESHOLD: i64 = 10_000_000_000;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Normalize an arbitrary JSON value.
pub fn normalize(value: &Value) -> i64 {
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => normalize_int(i),
            None => n.as_f64().map(normalize_number).unwrap_or_else(now_millis),
        },
        Value::String(s) => normalize_str(s),
        _ => now_millis(),
    }
}

/// Normalize a string: integer first, then float, then a date string.
pub fn normalize_str(raw: &str) -> i64 {
    let raw = raw.trim();
    if let Ok(i) = raw.parse::<i64>() {
        return normalize_int(i);
    }
    if let Ok(f) = raw.parse::<f64>() {
        if f.is_finite() {
            return normalize_number(f);
        }
    }
    parse_date(raw).unwrap_or_else(now_millis)
}

pub fn normalize_int(value: i64) -> i64 {
    if value < SECONDS_THRESHOLD {
        value.saturating_mul(1000)
    } else {
        value
    }
}

/// Fractional seconds are rounded to the nearest millisecond.
pub fn normalize_number(value: f64) -> i64 {
    if !value.is_finite() {
        return now_millis();
    }
    if value < SECONDS_THRESHOLD as f64 {
        (value * 1000.0).round() as i64
    } else {
        value.round() as i64
    }
}

/// Parse a date / date-time string. Zone-less values are read as UTC.
pub fn parse_date(raw: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.timestamp_millis());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.timestamp_millis());
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
            return d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc().timestamp_millis());
        }
    }
    None
}

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
