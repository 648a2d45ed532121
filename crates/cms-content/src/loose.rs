//! Lenient deserializers for loosely-typed CMS payloads.
//!
//! The CMS encodes its records as XML-RPC structs built from untyped arrays, so
//! the same field can arrive as a string, an integer, `false` or not at all.
//! These helpers normalize such values without failing:
//!
//! - [`string`]: any scalar becomes text, `null`/`false`/containers become `""`
//! - [`int`]: lenient integer parsing (leading digits, otherwise `0`)
//! - [`list`]: arrays are deserialized, anything else is an empty list
//! - [`record`] / [`optional_record`]: structs are deserialized, anything else
//!   falls back to the default / `None`

use std::collections::BTreeMap;

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub(crate) fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_string(&Value::deserialize(deserializer)?))
}

pub(crate) fn int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_int(&Value::deserialize(deserializer)?))
}

pub(crate) fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(D::Error::custom))
            .collect(),
        _ => Ok(Vec::new()),
    }
}

/// Like [`list`], but keeps "not a list" distinguishable from "empty list".
pub(crate) fn optional_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(D::Error::custom))
            .collect::<Result<Vec<T>, _>>()
            .map(Some),
        _ => Ok(None),
    }
}

pub(crate) fn record<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(optional_record(deserializer)?.unwrap_or_default())
}

pub(crate) fn optional_record<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        value @ Value::Object(_) => serde_json::from_value(value)
            .map(Some)
            .map_err(D::Error::custom),
        _ => Ok(None),
    }
}

pub(crate) fn map<'de, D, T>(deserializer: D) -> Result<BTreeMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Object(entries) => entries
            .into_iter()
            .map(|(key, value)| {
                serde_json::from_value(value)
                    .map(|v| (key, v))
                    .map_err(D::Error::custom)
            })
            .collect(),
        _ => Ok(BTreeMap::new()),
    }
}

/// Render a scalar as text the way the CMS would print it.
#[must_use]
pub(crate) fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(true) => "1".to_owned(),
        Value::Bool(false) | Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

/// Coerce a value to an integer, falling back to `0`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn value_to_int(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => parse_int(s),
        Value::Bool(true) => 1,
        Value::Bool(false) | Value::Null | Value::Array(_) | Value::Object(_) => 0,
    }
}

/// Parse the leading integer of a string (`"100px"` is `100`, `"abc"` is `0`).
#[must_use]
pub(crate) fn parse_int(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    let magnitude = digits[..end].parse::<i64>().unwrap_or(0);
    if negative { -magnitude } else { magnitude }
}
