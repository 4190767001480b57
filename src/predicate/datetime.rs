//! Comparison-operand parsing
//!
//! `>` and `<` operands arrive as strings. With a `|dt` suffix the operand
//! is a point in time: RFC3339 first, then a small set of permissive
//! calendar formats, then a bare integer epoch. Without the suffix it is an
//! integer when it parses as one, otherwise a plain string compared
//! lexicographically.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

use super::term::OrderedValue;

/// Calendar formats accepted after RFC3339 fails. Dates resolve to midnight
/// UTC.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y"];

/// Parses a `|dt`-suffixed operand: RFC3339, then permissive calendar, then
/// integer epoch. A string that is none of these stays a plain string so the
/// comparison fails closed instead of erroring.
pub fn parse_epoch_operand(raw: &str) -> OrderedValue {
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return OrderedValue::Epoch(t.timestamp());
    }
    if let Some(epoch) = parse_permissive(raw) {
        return OrderedValue::Epoch(epoch);
    }
    if let Ok(epoch) = raw.parse::<i64>() {
        return OrderedValue::Epoch(epoch);
    }
    OrderedValue::Str(raw.to_string())
}

/// Parses an unsuffixed operand: integer when it is one, string otherwise.
pub fn parse_plain_operand(raw: &str) -> OrderedValue {
    match raw.parse::<i64>() {
        Ok(i) => OrderedValue::Int(i),
        Err(_) => OrderedValue::Str(raw.to_string()),
    }
}

fn parse_permissive(raw: &str) -> Option<i64> {
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(Utc.from_utc_datetime(&dt).timestamp());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
            let dt = d.and_hms_opt(0, 0, 0)?;
            return Some(Utc.from_utc_datetime(&dt).timestamp());
        }
    }
    None
}

/// Reads a row field as epoch seconds: numbers are taken as-is, strings get
/// the same RFC3339-then-permissive ladder as operands. Anything else is not
/// a time.
pub(crate) fn row_epoch(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            if let Ok(t) = DateTime::parse_from_rfc3339(s) {
                return Some(t.timestamp());
            }
            parse_permissive(s)
        }
        _ => None,
    }
}
