//! Decoding of SQL API result cells.
//!
//! The SQL API ships every cell as a JSON string (or null) and describes the
//! column type separately in `rowType`. This module turns those raw strings
//! into [`Value`]s by type. A cell that fails to decode falls back to the raw
//! string untouched; this is type decoding, not result validation.

use super::types::Value;
use chrono::{DateTime, FixedOffset};

/// Decodes one raw cell using the column's Snowflake type and scale.
pub(crate) fn decode_value(raw: Option<&str>, data_type: &str, scale: Option<i64>) -> Value {
    let Some(raw) = raw else {
        return Value::Null;
    };

    let decoded = match data_type {
        "fixed" => decode_fixed(raw, scale),
        "real" | "float" | "double" => raw.parse::<f64>().ok().map(Value::Float),
        "boolean" => decode_boolean(raw),
        "binary" => hex::decode(raw).ok().map(Value::Bytes),
        "date" => decode_date(raw),
        "time" => decode_time(raw),
        "timestamp_ntz" | "timestamp_ltz" => decode_timestamp(raw),
        "timestamp_tz" => decode_timestamp_tz(raw),
        _ => Some(Value::String(raw.to_string())),
    };

    decoded.unwrap_or_else(|| Value::String(raw.to_string()))
}

/// `fixed` with scale 0 is an integer, anything scaled is a float.
///
/// NUMBER(38,0) values beyond the i64 range fall back to the raw string.
fn decode_fixed(raw: &str, scale: Option<i64>) -> Option<Value> {
    if scale.unwrap_or(0) == 0 {
        raw.parse::<i64>().ok().map(Value::Int)
    } else {
        raw.parse::<f64>().ok().map(Value::Float)
    }
}

fn decode_boolean(raw: &str) -> Option<Value> {
    match raw {
        "true" | "1" => Some(Value::Bool(true)),
        "false" | "0" => Some(Value::Bool(false)),
        _ => None,
    }
}

/// `date` arrives as days since the epoch.
fn decode_date(raw: &str) -> Option<Value> {
    let days: i64 = raw.parse().ok()?;
    let timestamp = DateTime::from_timestamp(days.checked_mul(86_400)?, 0)?;
    Some(Value::String(timestamp.date_naive().to_string()))
}

/// `time` arrives as (possibly fractional) seconds since midnight.
fn decode_time(raw: &str) -> Option<Value> {
    let (secs, nanos) = parse_epoch(raw)?;
    if !(0..86_400).contains(&secs) {
        return None;
    }

    let formatted = format!(
        "{:02}:{:02}:{:02}{}",
        secs / 3600,
        (secs % 3600) / 60,
        secs % 60,
        fraction_suffix(nanos)
    );
    Some(Value::String(formatted))
}

/// `timestamp_ntz` and `timestamp_ltz` arrive as fractional epoch seconds.
fn decode_timestamp(raw: &str) -> Option<Value> {
    let (secs, nanos) = parse_epoch(raw)?;
    let timestamp = DateTime::from_timestamp(secs, nanos)?;

    let formatted = format!(
        "{}{}",
        timestamp.format("%Y-%m-%d %H:%M:%S"),
        fraction_suffix(nanos)
    );
    Some(Value::String(formatted))
}

/// `timestamp_tz` arrives as fractional epoch seconds plus an offset field
/// encoded as minutes from UTC shifted by 1440.
fn decode_timestamp_tz(raw: &str) -> Option<Value> {
    let mut parts = raw.split_whitespace();
    let epoch = parts.next()?;
    let offset_field: i32 = parts.next()?.parse().ok()?;

    let (secs, nanos) = parse_epoch(epoch)?;
    let offset = FixedOffset::east_opt((offset_field - 1440) * 60)?;
    let timestamp = DateTime::from_timestamp(secs, nanos)?.with_timezone(&offset);

    let formatted = format!(
        "{}{} {}",
        timestamp.format("%Y-%m-%d %H:%M:%S"),
        fraction_suffix(nanos),
        timestamp.format("%:z")
    );
    Some(Value::String(formatted))
}

/// Splits `"<seconds>.<fraction>"` into whole seconds and nanoseconds.
fn parse_epoch(raw: &str) -> Option<(i64, u32)> {
    let (secs, frac) = match raw.split_once('.') {
        Some((secs, frac)) => (secs, frac),
        None => (raw, ""),
    };

    let secs: i64 = secs.parse().ok()?;
    let nanos = if frac.is_empty() {
        0
    } else {
        let padded: String = format!("{frac:0<9}").chars().take(9).collect();
        padded.parse().ok()?
    };

    Some((secs, nanos))
}

/// Renders nanoseconds as a trailing `.fraction`, empty when zero.
fn fraction_suffix(nanos: u32) -> String {
    if nanos == 0 {
        String::new()
    } else {
        format!(".{}", format!("{nanos:09}").trim_end_matches('0'))
    }
}
