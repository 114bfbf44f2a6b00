//! Conversion from decoded documents into the value model.
//!
//! Decoding itself is left to `serde_json`, `toml` and `serde_yaml`; this
//! module only normalizes their trees into [`Value`].

use std::fmt;
use std::path::Path;

use super::value::{Key, Mapping, Value};
use super::ConfigError;

/// A supported input format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Toml,
    Yaml,
}

impl Format {
    /// Picks a format from a file extension (`json`, `toml`, `yaml`, `yml`).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "json" => Some(Format::Json),
            "toml" => Some(Format::Toml),
            "yaml" | "yml" => Some(Format::Yaml),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Format::Json => "JSON",
            Format::Toml => "TOML",
            Format::Yaml => "YAML",
        })
    }
}

/// Decodes `text` and returns its top-level mapping.
pub fn parse_str(format: Format, text: &str) -> Result<Mapping, ConfigError> {
    match format {
        Format::Json => {
            let doc: serde_json::Value = serde_json::from_str(text)?;
            match doc {
                serde_json::Value::Object(map) => {
                    Ok(map.into_iter().map(|(k, v)| (k, v.into())).collect())
                }
                _ => Err(ConfigError::NotAMapping(format)),
            }
        }
        Format::Toml => {
            let table: toml::Table = toml::from_str(text)?;
            Ok(table.into_iter().map(|(k, v)| (k, v.into())).collect())
        }
        Format::Yaml => {
            let doc: serde_yaml::Value = serde_yaml::from_str(text)?;
            match doc {
                serde_yaml::Value::Null => Ok(Mapping::new()),
                serde_yaml::Value::Mapping(map) => Ok(map
                    .into_iter()
                    .map(|(k, v)| (Value::from(k).to_string(), v.into()))
                    .collect()),
                _ => Err(ConfigError::NotAMapping(format)),
            }
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match value {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::Uint(u)
                } else {
                    Value::Float(n.as_f64().unwrap_or_default())
                }
            }
            Json::String(s) => Value::String(s),
            Json::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
            Json::Object(map) => Value::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect()),
        }
    }
}

impl From<toml::Value> for Value {
    fn from(value: toml::Value) -> Self {
        use toml::Value as Toml;

        match value {
            Toml::String(s) => Value::String(s),
            Toml::Integer(i) => Value::Int(i),
            Toml::Float(f) => Value::Float(f),
            Toml::Boolean(b) => Value::Bool(b),
            Toml::Datetime(dt) => Value::String(dt.to_string()),
            Toml::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
            Toml::Table(table) => {
                Value::Map(table.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

impl From<serde_yaml::Value> for Value {
    fn from(value: serde_yaml::Value) -> Self {
        use serde_yaml::Value as Yaml;

        match value {
            Yaml::Null => Value::Null,
            Yaml::Bool(b) => Value::Bool(b),
            Yaml::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::Uint(u)
                } else {
                    Value::Float(n.as_f64().unwrap_or_default())
                }
            }
            Yaml::String(s) => Value::String(s),
            Yaml::Sequence(items) => Value::List(items.into_iter().map(Value::from).collect()),
            Yaml::Mapping(map) => Value::AnyMap(
                map.into_iter()
                    .map(|(k, v)| (yaml_key(k), v.into()))
                    .collect(),
            ),
            Yaml::Tagged(tagged) => Value::from(tagged.value),
        }
    }
}

fn yaml_key(key: serde_yaml::Value) -> Key {
    match Value::from(key) {
        Value::String(s) => Key::Str(s),
        Value::Int(i) => Key::Int(i),
        Value::Bool(b) => Key::Bool(b),
        other => Key::Str(other.to_string()),
    }
}
