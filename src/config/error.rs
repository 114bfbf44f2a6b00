use std::num::{ParseFloatError, ParseIntError};
use std::path::PathBuf;

use thiserror::Error;

use super::Format;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid config key string")]
    InvalidKey,

    #[error("key '{0}' does not exist in the configuration data")]
    NotFound(String),

    #[error("invalid index '{segment}' in key '{key}'")]
    BadIndex { key: String, segment: String },

    #[error("cannot descend into segment '{segment}' of key '{key}'")]
    NotTraversable { key: String, segment: String },

    #[error("value of key '{key}' is a {found}, cannot be converted to {target}")]
    TypeMismatch {
        key: String,
        found: &'static str,
        target: &'static str,
    },

    #[error("value '{value}' of key '{key}' is not an integer: {source}")]
    ParseInt {
        key: String,
        value: String,
        source: ParseIntError,
    },

    #[error("value '{value}' of key '{key}' is not a float: {source}")]
    ParseFloat {
        key: String,
        value: String,
        source: ParseFloatError,
    },

    #[error("the value '{value}' of key '{key}' cannot be converted to bool")]
    ParseBool { key: String, value: String },

    #[error("failed to encode value of key '{key}': {source}")]
    Encode {
        key: String,
        source: serde_json::Error,
    },

    #[error("failed to decode value of key '{key}': {source}")]
    Decode {
        key: String,
        source: serde_json::Error,
    },

    #[error("the configuration is readonly")]
    Readonly,

    #[error("required config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        source: Box<ConfigError>,
    },

    #[error("unsupported config file format: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("{0} document is not a mapping at the top level")]
    NotAMapping(Format),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
