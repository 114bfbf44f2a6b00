//! The configuration value model.
//!
//! Every node in the tree is a [`Value`]. Sequences and mappings each come in
//! three shapes, depending on where the data came from: typed constructors
//! produce the homogeneous forms (`Ints`, `Strings`, `StrMap`), format decoders
//! produce the untyped ones (`List`, `Map`, and `AnyMap` for YAML).

use std::collections::HashMap;
use std::fmt;

use serde::{Serialize, Serializer};

/// The root of a configuration tree: string keys, arbitrary values.
pub type Mapping = HashMap<String, Value>;

/// A configuration node.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    String(String),
    /// Homogeneous integer sequence.
    Ints(Vec<i64>),
    /// Homogeneous string sequence.
    Strings(Vec<String>),
    /// Heterogeneous sequence, as produced by format decoders.
    List(Vec<Value>),
    /// String-keyed, string-valued mapping.
    StrMap(HashMap<String, String>),
    /// String-keyed mapping of arbitrary values.
    Map(Mapping),
    /// Mapping whose keys are not guaranteed to be strings.
    AnyMap(HashMap<Key, Value>),
}

/// A key of an [`Value::AnyMap`].
///
/// Only `Str` keys are reachable by path segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Str(String),
    Int(i64),
    Bool(bool),
}

impl Value {
    /// Returns `true` for `Map`, `StrMap` and `AnyMap`.
    pub fn is_mapping(&self) -> bool {
        matches!(self, Value::StrMap(_) | Value::Map(_) | Value::AnyMap(_))
    }

    /// Short name of the node shape, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) | Value::Uint(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Ints(_) => "integer sequence",
            Value::Strings(_) => "string sequence",
            Value::List(_) => "sequence",
            Value::StrMap(_) => "string map",
            Value::Map(_) | Value::AnyMap(_) => "map",
        }
    }
}

/// Canonical text form: scalars print plainly, sequences as `[a b]` and
/// mappings as `map[k:v]` with keys sorted. `Null` prints as nothing.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Uint(u) => write!(f, "{u}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::String(s) => f.write_str(s),
            Value::Ints(items) => write_seq(f, items),
            Value::Strings(items) => write_seq(f, items),
            Value::List(items) => write_seq(f, items),
            Value::StrMap(map) => write_map(f, map.iter().map(|(k, v)| (k.clone(), v.clone()))),
            Value::Map(map) => write_map(f, map.iter().map(|(k, v)| (k.clone(), v.to_string()))),
            Value::AnyMap(map) => {
                write_map(f, map.iter().map(|(k, v)| (k.to_string(), v.to_string())))
            }
        }
    }
}

fn write_seq<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    f.write_str("[")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{item}")?;
    }
    f.write_str("]")
}

fn write_map(
    f: &mut fmt::Formatter<'_>,
    entries: impl Iterator<Item = (String, String)>,
) -> fmt::Result {
    let mut entries: Vec<_> = entries.collect();
    entries.sort();
    f.write_str("map[")?;
    for (i, (k, v)) in entries.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{k}:{v}")?;
    }
    f.write_str("]")
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Str(s) => f.write_str(s),
            Key::Int(i) => write!(f, "{i}"),
            Key::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Uint(u) => serializer.serialize_u64(*u),
            Value::Float(x) => serializer.serialize_f64(*x),
            Value::String(s) => serializer.serialize_str(s),
            Value::Ints(items) => items.serialize(serializer),
            Value::Strings(items) => items.serialize(serializer),
            Value::List(items) => items.serialize(serializer),
            Value::StrMap(map) => map.serialize(serializer),
            Value::Map(map) => map.serialize(serializer),
            // Keys are stringified so text formats without non-string keys can hold them.
            Value::AnyMap(map) => serializer.collect_map(map.iter().map(|(k, v)| (k.to_string(), v))),
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Str(s.to_string())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Str(s)
    }
}

impl From<i64> for Key {
    fn from(i: i64) -> Self {
        Key::Int(i)
    }
}

impl From<bool> for Key {
    fn from(b: bool) -> Self {
        Key::Bool(b)
    }
}

macro_rules! from_signed {
    ($($t:ty),*) => {$(
        impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::Int(v as i64)
            }
        }
    )*};
}

macro_rules! from_unsigned {
    ($($t:ty),*) => {$(
        impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::Uint(v as u64)
            }
        }
    )*};
}

from_signed!(i8, i16, i32, i64, isize);
from_unsigned!(u8, u16, u32, u64, usize);

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v as f64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Vec<i64>> for Value {
    fn from(v: Vec<i64>) -> Self {
        Value::Ints(v)
    }
}

impl From<Vec<String>> for Value {
    fn from(v: Vec<String>) -> Self {
        Value::Strings(v)
    }
}

impl From<Vec<&str>> for Value {
    fn from(v: Vec<&str>) -> Self {
        Value::Strings(v.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}

impl From<HashMap<String, String>> for Value {
    fn from(v: HashMap<String, String>) -> Self {
        Value::StrMap(v)
    }
}

impl From<Mapping> for Value {
    fn from(v: Mapping) -> Self {
        Value::Map(v)
    }
}

impl From<HashMap<Key, Value>> for Value {
    fn from(v: HashMap<Key, Value>) -> Self {
        Value::AnyMap(v)
    }
}
