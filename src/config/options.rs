use std::fmt;
use std::sync::Arc;

use super::Config;

/// Behaviour switches for a [`Config`]. Fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Expand `${NAME}` and `${NAME|default}` in string values.
    pub parse_env: bool,
    /// Memoize string, string-sequence and string-map reads per key.
    pub enable_cache: bool,
    /// Allow keys such as `map.key` to walk into nested values.
    pub parse_key: bool,
    /// Separator between key path segments.
    pub delimiter: char,
    /// Reject writes and read without locking.
    pub readonly: bool,
    /// Called after every change to the data.
    pub on_change: Option<ChangeHook>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            parse_env: false,
            enable_cache: false,
            parse_key: true,
            delimiter: '.',
            readonly: false,
            on_change: None,
        }
    }
}

/// A change to the store's data, passed to the [`ChangeHook`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Event {
    /// A single key was written with [`Config::set`].
    SetValue { key: String },
    /// The whole data was replaced with [`Config::set_data`].
    SetData,
    /// Data was merged in by one of the `load_*` methods.
    LoadData,
    /// Everything was removed with [`Config::clear_all`].
    CleanData,
}

impl Event {
    /// Short dotted name, e.g. `set.value`.
    pub fn name(&self) -> &'static str {
        match self {
            Event::SetValue { .. } => "set.value",
            Event::SetData => "set.data",
            Event::LoadData => "load.data",
            Event::CleanData => "clean.data",
        }
    }
}

/// Callback fired after the store's data changes.
///
/// It runs after the store's locks are released, so it may read from the
/// store it is handed.
#[derive(Clone)]
pub struct ChangeHook(Arc<dyn Fn(&Event, &Config) + Send + Sync>);

impl ChangeHook {
    pub fn new(hook: impl Fn(&Event, &Config) + Send + Sync + 'static) -> Self {
        Self(Arc::new(hook))
    }

    pub(crate) fn call(&self, event: &Event, config: &Config) {
        (self.0)(event, config)
    }
}

impl fmt::Debug for ChangeHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ChangeHook(..)")
    }
}

impl PartialEq for ChangeHook {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for ChangeHook {}
