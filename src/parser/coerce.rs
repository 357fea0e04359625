//! Text-to-value coercions for NetXML fields
//!
//! Every conversion preserves absence: `None` or empty text yields `None`.
//! Integer and boolean conversions drop malformed text silently, while
//! float and timestamp conversions report it as a [`CoerceError`].

use chrono::{NaiveDateTime, Weekday};
use thiserror::Error;

/// Layout of Kismet timestamps after the weekday, e.g. `May  6 08:23:31 2015`
const TIMESTAMP_FORMAT: &str = "%b %e %H:%M:%S %Y";

/// Malformed text for a conversion that does not absorb errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoerceError {
    #[error("invalid floating point value {value:?}")]
    InvalidFloat { value: String },
    #[error("invalid timestamp {value:?}, expected e.g. \"Wed May  6 08:23:31 2015\"")]
    InvalidTimestamp { value: String },
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.is_empty())
}

pub fn to_string(value: Option<&str>) -> Option<String> {
    present(value).map(str::to_string)
}

/// Parse an optionally negative run of ASCII digits.
///
/// Anything else, including values that overflow `i64`, becomes `None`.
pub fn to_integer(value: Option<&str>) -> Option<i64> {
    let text = present(value)?;
    let digits = text.strip_prefix('-').unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

pub fn to_float(value: Option<&str>) -> Result<Option<f64>, CoerceError> {
    let Some(text) = present(value) else {
        return Ok(None);
    };
    text.trim()
        .parse::<f64>()
        .map(Some)
        .map_err(|_| CoerceError::InvalidFloat {
            value: text.to_string(),
        })
}

/// Only `True`/`true` and `False`/`false` are recognised.
pub fn to_boolean(value: Option<&str>) -> Option<bool> {
    match present(value)? {
        "True" | "true" => Some(true),
        "False" | "false" => Some(false),
        _ => None,
    }
}

/// Parse a ctime-style timestamp such as `Wed May  6 08:23:31 2015`.
///
/// The weekday must be a three letter weekday name but is not checked
/// against the calendar date.
pub fn to_timestamp(value: Option<&str>) -> Result<Option<NaiveDateTime>, CoerceError> {
    let Some(text) = present(value) else {
        return Ok(None);
    };
    let invalid = || CoerceError::InvalidTimestamp {
        value: text.to_string(),
    };

    let (weekday, rest) = text
        .trim()
        .split_once(char::is_whitespace)
        .ok_or_else(invalid)?;
    if weekday.len() != 3 || weekday.parse::<Weekday>().is_err() {
        return Err(invalid());
    }

    NaiveDateTime::parse_from_str(rest.trim_start(), TIMESTAMP_FORMAT)
        .map(Some)
        .map_err(|_| invalid())
}
