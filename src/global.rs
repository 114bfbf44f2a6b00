//! A process-wide default store for programs that only need one.
//!
//! Libraries should take a [`Config`] explicitly instead.
//!
//! ## Example
//!
//! ```
//! use confpath::{global, Format};
//!
//! global().load_str(Format::Json, r#"{"app": {"name": "demo"}}"#)?;
//! assert_eq!(confpath::global::string("app.name").as_deref(), Some("demo"));
//! # Ok::<(), confpath::ConfigError>(())
//! ```

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::config::{Config, Value};

static DEFAULT: Lazy<Config> = Lazy::new(Config::new);

/// The shared default store, created empty on first use.
pub fn global() -> &'static Config {
    &DEFAULT
}

pub fn get(key: &str) -> Option<Value> {
    DEFAULT.get(key)
}

pub fn exists(key: &str) -> bool {
    DEFAULT.exists(key)
}

pub fn string(key: &str) -> Option<String> {
    DEFAULT.string(key)
}

pub fn int(key: &str) -> Option<i32> {
    DEFAULT.int(key)
}

pub fn int64(key: &str) -> Option<i64> {
    DEFAULT.int64(key)
}

pub fn float(key: &str) -> Option<f64> {
    DEFAULT.float(key)
}

pub fn bool(key: &str) -> Option<bool> {
    DEFAULT.bool(key)
}

pub fn strings(key: &str) -> Option<Vec<String>> {
    DEFAULT.strings(key)
}

pub fn string_map(key: &str) -> Option<HashMap<String, String>> {
    DEFAULT.string_map(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_functions_read_the_default_store() {
        global().set("global_test.port", 8080).unwrap();
        global().set("global_test.hosts", vec!["a", "b"]).unwrap();

        assert!(exists("global_test.port"));
        assert_eq!(int("global_test.port"), Some(8080));
        assert_eq!(int64("global_test.port"), Some(8080));
        assert_eq!(float("global_test.port"), Some(8080.0));
        assert_eq!(string("global_test.hosts.1").as_deref(), Some("b"));
        assert_eq!(strings("global_test.hosts"), Some(vec!["a".into(), "b".into()]));
        assert_eq!(string_map("global_test").map(|m| m.len()), Some(2));
        assert_eq!(bool("global_test.missing"), None);
        assert!(get("global_test").is_some());
    }
}
