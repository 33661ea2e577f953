//! Value normalizers: raw JSON scalar -> typed value.
//!
//! Every function here is total — malformed input degrades to `None` with a
//! debug-level diagnostic, never a panic or an error. Source documents use
//! literal sentinels (`-`, `N.A`, `NA`, empty) for "no data"; those map to
//! `None` everywhere so the downstream coalesce-preserve merge treats them
//! as absent rather than as data.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::debug;

use once_cell::sync::Lazy;

/// Date formats attempted in order, day-first variants ahead of ISO.
const DATETIME_FORMATS: [&str; 4] = [
    "%d-%m-%Y %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];
const DATE_FORMATS: [&str; 4] = ["%d-%m-%Y", "%d/%m/%Y", "%d-%b-%Y", "%Y-%m-%d"];

static NUMERIC_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("numeric token regex"));

/// A parsed date value: a plain day when the time-of-day was midnight (or
/// absent), otherwise a full timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateValue {
    /// Calendar date without a meaningful time-of-day.
    Day(NaiveDate),
    /// Full timestamp.
    Instant(NaiveDateTime),
}

/// True when the raw value is one of the source sentinels for "no data".
pub fn is_absent(raw: &Value) -> bool {
    match raw {
        Value::Null => true,
        Value::String(s) => {
            let t = s.trim().to_uppercase();
            matches!(t.as_str(), "" | "-" | "N.A" | "N.A." | "NA")
        }
        _ => false,
    }
}

/// Raw value as a displayable scalar string, if it is a scalar at all.
fn scalar_text(raw: &Value) -> Option<String> {
    match raw {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Sentinel check + trim. Non-scalar input yields `None`.
pub fn normalize_string(raw: &Value) -> Option<String> {
    if is_absent(raw) {
        return None;
    }
    let s = scalar_text(raw)?;
    let t = s.trim();
    if t.is_empty() { None } else { Some(t.to_string()) }
}

/// Like [`normalize_string`] but silently truncated to `max_len` characters,
/// matching destination column width constraints.
pub fn normalize_string_max(raw: &Value, max_len: usize) -> Option<String> {
    normalize_string(raw).map(|s| {
        if s.chars().count() > max_len {
            s.chars().take(max_len).collect()
        } else {
            s
        }
    })
}

/// Parses a raw date field, preferring day-first interpretation.
///
/// Accepts plain strings, Mongo extended JSON (`{"$date": ...}`), and
/// numbers (epoch millis inside `$date`). A parsed timestamp whose
/// time-of-day is midnight collapses to [`DateValue::Day`].
pub fn normalize_date(raw: &Value) -> Option<DateValue> {
    if is_absent(raw) {
        return None;
    }
    // mongoexport wraps typed dates: {"$date": "..."} or {"$date": {"$numberLong": "..."}}
    if let Value::Object(obj) = raw {
        let inner = obj.get("$date")?;
        return match inner {
            Value::String(_) => normalize_date(inner),
            Value::Number(n) => n
                .as_i64()
                .and_then(chrono::DateTime::from_timestamp_millis)
                .map(|dt| collapse_midnight(dt.naive_utc())),
            Value::Object(o) => o
                .get("$numberLong")
                .and_then(Value::as_str)
                .and_then(|s| s.parse::<i64>().ok())
                .and_then(chrono::DateTime::from_timestamp_millis)
                .map(|dt| collapse_midnight(dt.naive_utc())),
            _ => None,
        };
    }
    let s = scalar_text(raw)?;
    let t = s.trim();

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(t) {
        return Some(collapse_midnight(dt.naive_utc()));
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(t, fmt) {
            return Some(collapse_midnight(dt));
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(t, fmt) {
            return Some(DateValue::Day(d));
        }
    }
    debug!(value = %t, "normalize_date: unparsable input");
    None
}

fn collapse_midnight(dt: NaiveDateTime) -> DateValue {
    if dt.time() == NaiveTime::MIN {
        DateValue::Day(dt.date())
    } else {
        DateValue::Instant(dt)
    }
}

/// Parses a raw numeric field as an exact decimal.
///
/// With `is_percent` a trailing `%` is stripped first. Everything that is
/// not a digit, a dot, or a leading minus is dropped before parsing, so
/// inputs like `"Rs. 1,00,000"` or `"8.40 %"` still yield a value.
pub fn normalize_decimal(raw: &Value, is_percent: bool) -> Option<Decimal> {
    if is_absent(raw) {
        return None;
    }
    let s = scalar_text(raw)?;
    let mut s = s.trim().to_string();
    if is_percent {
        s = s.replace('%', "");
    }
    let mut cleaned = String::with_capacity(s.len());
    for c in s.chars() {
        if c.is_ascii_digit() || c == '.' {
            cleaned.push(c);
        } else if c == '-' && cleaned.is_empty() {
            cleaned.push(c);
        }
    }
    if cleaned.is_empty() || cleaned == "-" {
        return None;
    }
    match cleaned.parse::<Decimal>() {
        Ok(d) => Some(d),
        Err(_) => {
            debug!(value = %s, "normalize_decimal: unparsable input");
            None
        }
    }
}

/// Parses a raw field as a whole number, tolerating inputs like `"10.0"`.
pub fn normalize_integer(raw: &Value) -> Option<i64> {
    use rust_decimal::prelude::ToPrimitive;
    normalize_decimal(raw, false).and_then(|d| d.trunc().to_i64())
}

/// Tri-state boolean: sentinel stays absent; {yes, true, y, 1, t} is true
/// (case-insensitive); any other scalar is false.
pub fn normalize_boolean(raw: &Value) -> Option<bool> {
    if is_absent(raw) {
        return None;
    }
    if let Value::Bool(b) = raw {
        return Some(*b);
    }
    let s = scalar_text(raw)?;
    let t = s.trim().to_lowercase();
    Some(matches!(t.as_str(), "yes" | "true" | "y" | "1" | "t"))
}

/// Every numeric token in `text`, in order of appearance, as exact decimals.
pub fn numeric_tokens(text: &str) -> Vec<Decimal> {
    NUMERIC_TOKEN
        .find_iter(text)
        .filter_map(|m| m.as_str().parse::<Decimal>().ok())
        .collect()
}
