//! Coercion from resolved values into the typed accessor results.

use std::collections::HashMap;

use super::env::interpolate;
use super::value::Value;
use super::ConfigError;

/// Text form of a resolved value. String values are interpolated when
/// `parse_env` is set; everything else uses the canonical [`Value`] display.
pub(crate) fn to_text(value: &Value, parse_env: bool) -> String {
    match value {
        Value::String(s) if parse_env => interpolate(s).into_owned(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub(crate) fn parse_int<T: std::str::FromStr<Err = std::num::ParseIntError>>(
    key: &str,
    text: &str,
) -> Result<T, ConfigError> {
    text.parse().map_err(|source| ConfigError::ParseInt {
        key: key.to_string(),
        value: text.to_string(),
        source,
    })
}

pub(crate) fn parse_float(key: &str, text: &str) -> Result<f64, ConfigError> {
    text.parse().map_err(|source| ConfigError::ParseFloat {
        key: key.to_string(),
        value: text.to_string(),
        source,
    })
}

/// Accepts `true/yes/1` and `false/no/0/""`, case-insensitive.
pub(crate) fn parse_bool(key: &str, text: &str) -> Result<bool, ConfigError> {
    match text.to_lowercase().as_str() {
        "" | "0" | "false" | "no" => Ok(false),
        "1" | "true" | "yes" => Ok(true),
        lower => Err(ConfigError::ParseBool {
            key: key.to_string(),
            value: lower.to_string(),
        }),
    }
}

pub(crate) fn to_ints(key: &str, value: &Value) -> Result<Vec<i64>, ConfigError> {
    match value {
        Value::Ints(items) => Ok(items.clone()),
        Value::List(items) => items
            .iter()
            .map(|item| parse_int::<i64>(key, &item.to_string()))
            .collect(),
        other => Err(mismatch(key, other, "integer sequence")),
    }
}

pub(crate) fn to_int_map(key: &str, value: &Value) -> Result<HashMap<String, i64>, ConfigError> {
    match value {
        Value::Map(map) => map
            .iter()
            .map(|(k, v)| parse_int::<i64>(key, &v.to_string()).map(|n| (k.clone(), n)))
            .collect(),
        Value::AnyMap(map) => map
            .iter()
            .map(|(k, v)| parse_int::<i64>(key, &v.to_string()).map(|n| (k.to_string(), n)))
            .collect(),
        other => Err(mismatch(key, other, "integer map")),
    }
}

pub(crate) fn to_strings(key: &str, value: &Value) -> Result<Vec<String>, ConfigError> {
    match value {
        Value::Strings(items) => Ok(items.clone()),
        Value::List(items) => Ok(items.iter().map(Value::to_string).collect()),
        other => Err(mismatch(key, other, "string sequence")),
    }
}

pub(crate) fn to_string_map(
    key: &str,
    value: &Value,
) -> Result<HashMap<String, String>, ConfigError> {
    match value {
        Value::StrMap(map) => Ok(map.clone()),
        Value::Map(map) => Ok(map.iter().map(|(k, v)| (k.clone(), v.to_string())).collect()),
        Value::AnyMap(map) => Ok(map
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()),
        other => Err(mismatch(key, other, "string map")),
    }
}

fn mismatch(key: &str, value: &Value, target: &'static str) -> ConfigError {
    ConfigError::TypeMismatch {
        key: key.to_string(),
        found: value.kind(),
        target,
    }
}
