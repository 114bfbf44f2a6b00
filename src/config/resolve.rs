//! Key path resolution.
//!
//! A key such as `db.hosts.0` is first tried as a literal top-level key, so
//! keys that contain the delimiter can be stored atomically. Only then is it
//! split and walked through nested mappings and sequences.

use std::borrow::Cow;

use super::value::{Key, Mapping, Value};
use super::ConfigError;

/// Trims whitespace, then leading and trailing delimiters.
pub(crate) fn format_key(key: &str, delimiter: char) -> &str {
    key.trim().trim_matches(delimiter)
}

/// Resolves `key` against `root`.
///
/// Elements of the homogeneous shapes (`Ints`, `Strings`, `StrMap`) are not
/// stored as [`Value`]s, so they come back owned. Everything else is borrowed.
pub(crate) fn lookup<'a>(
    root: &'a Mapping,
    key: &str,
    delimiter: char,
    find_by_path: bool,
) -> Result<Cow<'a, Value>, ConfigError> {
    let key = format_key(key, delimiter);
    if key.is_empty() {
        return Err(ConfigError::InvalidKey);
    }

    if let Some(value) = root.get(key) {
        return Ok(Cow::Borrowed(value));
    }

    let not_found = || ConfigError::NotFound(key.to_string());

    if !find_by_path || !key.contains(delimiter) {
        return Err(not_found());
    }

    let mut segments = key.split(delimiter);
    let first = segments.next().ok_or_else(not_found)?;
    let mut node = root.get(first).ok_or_else(not_found)?;
    let mut segments = segments.peekable();

    while let Some(segment) = segments.next() {
        let leaf = match node {
            Value::Map(map) => {
                node = map.get(segment).ok_or_else(not_found)?;
                continue;
            }
            Value::AnyMap(map) => {
                node = map.get(&Key::from(segment)).ok_or_else(not_found)?;
                continue;
            }
            Value::List(items) => {
                node = &items[index(key, segment, items.len())?];
                continue;
            }
            Value::StrMap(map) => Value::String(map.get(segment).ok_or_else(not_found)?.clone()),
            Value::Ints(items) => Value::Int(items[index(key, segment, items.len())?]),
            Value::Strings(items) => {
                Value::String(items[index(key, segment, items.len())?].clone())
            }
            _ => return Err(not_traversable(key, segment)),
        };

        // Elements of homogeneous shapes are scalars; nothing below them.
        return match segments.peek() {
            Some(next) => Err(not_traversable(key, next)),
            None => Ok(Cow::Owned(leaf)),
        };
    }

    Ok(Cow::Borrowed(node))
}

/// Existence test with the same precedence and per-shape rules as [`lookup`].
pub(crate) fn exists(root: &Mapping, key: &str, delimiter: char, find_by_path: bool) -> bool {
    lookup(root, key, delimiter, find_by_path).is_ok()
}

fn index(key: &str, segment: &str, len: usize) -> Result<usize, ConfigError> {
    match segment.parse::<usize>() {
        Ok(i) if i < len => Ok(i),
        _ => Err(ConfigError::BadIndex {
            key: key.to_string(),
            segment: segment.to_string(),
        }),
    }
}

fn not_traversable(key: &str, segment: &str) -> ConfigError {
    ConfigError::NotTraversable {
        key: key.to_string(),
        segment: segment.to_string(),
    }
}
