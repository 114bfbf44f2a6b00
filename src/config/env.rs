//! Environment variable interpolation for string values.
//!
//! Supports `${NAME}` and `${NAME|default}`. A variable that is unset or empty
//! takes the default; without a default the token is left as written.
//! Whitespace around the name and the default is ignored, so `${ NAME }`
//! reads `NAME`.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static ENV_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([\w\-| ]+)\}").expect("env token pattern is valid"));

/// Replaces every `${...}` token in `value`.
///
/// All tokens are substituted in one pass, so the same token always resolves
/// to the same text within a call.
pub fn interpolate(value: &str) -> Cow<'_, str> {
    if !value.contains("${") {
        return Cow::Borrowed(value);
    }

    ENV_TOKEN.replace_all(value, |caps: &Captures<'_>| {
        let token = &caps[0];
        let (name, default) = match caps[1].split_once('|') {
            Some((name, default)) => (name.trim(), default.trim()),
            None => (caps[1].trim(), token),
        };

        match std::env::var(name) {
            Ok(val) if !val.is_empty() => val,
            _ => default.to_string(),
        }
    })
}
