use std::collections::HashMap;
use std::path::Path;

use once_cell::sync::OnceCell;
use parking_lot::{Mutex, RwLock};
use serde::de::DeserializeOwned;

use super::builder::ConfigBuilder;
use super::coerce;
use super::decode::{parse_str, Format};
use super::file::load_file;
use super::merge::{deep_merge, set_at_path};
use super::options::{Event, Options};
use super::resolve::{self, format_key};
use super::value::{Mapping, Value};
use super::ConfigError;

type Slot<T> = fn(&Caches) -> &HashMap<String, T>;
type SlotMut<T> = fn(&mut Caches) -> &mut HashMap<String, T>;

#[derive(Debug, Default)]
struct Caches {
    strings: HashMap<String, String>,
    string_slices: HashMap<String, Vec<String>>,
    string_maps: HashMap<String, HashMap<String, String>>,
}

impl Caches {
    fn clear(&mut self) {
        self.strings.clear();
        self.string_slices.clear();
        self.string_maps.clear();
    }

    fn retain(&mut self, keep: impl Fn(&str) -> bool) {
        self.strings.retain(|k, _| keep(k));
        self.string_slices.retain(|k, _| keep(k));
        self.string_maps.retain(|k, _| keep(k));
    }
}

/// An in-memory configuration store.
///
/// Values are read by key path (`db.hosts.0`) and coerced to the requested
/// type. Reads never fail loudly: a miss or a failed coercion yields `None`
/// (or the default / zero value) and, unless it is a plain missing key, the
/// error is appended to the store's error list. See [`take_errors`](Self::take_errors).
///
/// ## Example
///
/// ```
/// use confpath::{Config, Format};
///
/// let config = Config::new();
/// config.load_str(Format::Json, r#"{"db": {"port": 5432, "hosts": ["a", "b"]}}"#)?;
///
/// assert_eq!(config.int("db.port"), Some(5432));
/// assert_eq!(config.string("db.hosts.1").as_deref(), Some("b"));
/// assert_eq!(config.string_or("db.user", "postgres"), "postgres");
/// # Ok::<(), confpath::ConfigError>(())
/// ```
#[derive(Debug, Default)]
pub struct Config {
    options: Options,
    data: RwLock<Mapping>,
    frozen: OnceCell<Mapping>,
    caches: RwLock<Caches>,
    errors: Mutex<Vec<ConfigError>>,
}

impl Config {
    /// Creates an empty store with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store with the given options.
    ///
    /// With `options.readonly` set the store is frozen straight away and
    /// stays empty; use [`ConfigBuilder::readonly`] to load sources first.
    pub fn with_options(options: Options) -> Self {
        let config = Self::writable(options);
        if config.options.readonly {
            config.readonly();
        }
        config
    }

    /// Creates an empty store that is not frozen yet, whatever
    /// `options.readonly` says.
    pub(super) fn writable(options: Options) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Runs `f` against the current data, lock-free once the store is frozen.
    fn read<R>(&self, f: impl FnOnce(&Mapping) -> R) -> R {
        if let Some(data) = self.frozen.get() {
            return f(data);
        }
        let data = self.data.read();
        // The store may have been frozen while we waited for the lock.
        match self.frozen.get() {
            Some(frozen) => f(frozen),
            None => f(&data),
        }
    }

    fn resolve_with<R>(
        &self,
        key: &str,
        find_by_path: bool,
        f: impl FnOnce(&Value) -> Result<R, ConfigError>,
    ) -> Option<R> {
        let delimiter = self.options.delimiter;
        let result = self.read(|data| {
            let value = resolve::lookup(data, key, delimiter, find_by_path)?;
            f(&value)
        });
        self.ok_or_record(result)
    }

    fn ok_or_record<T>(&self, result: Result<T, ConfigError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.record(err);
                None
            }
        }
    }

    /// Serves `key` from a cache slot, or resolves and coerces it and fills
    /// the slot. Fills happen under the data read lock, so a writer that
    /// clears caches under the write lock never leaves a stale entry behind.
    fn cached<T: Clone>(
        &self,
        key: &str,
        slot: Slot<T>,
        slot_mut: SlotMut<T>,
        convert: impl FnOnce(&Value) -> Result<T, ConfigError>,
    ) -> Option<T> {
        if !self.options.enable_cache {
            return self.resolve_with(key, self.options.parse_key, convert);
        }
        if let Some(value) = slot(&self.caches.read()).get(key) {
            tracing::trace!(key, "cache hit");
            return Some(value.clone());
        }

        self.resolve_with(key, self.options.parse_key, |value| {
            let value = convert(value)?;
            slot_mut(&mut self.caches.write()).insert(key.to_string(), value.clone());
            Ok(value)
        })
    }

    fn record(&self, err: ConfigError) {
        if matches!(err, ConfigError::NotFound(_)) {
            return;
        }
        tracing::debug!(error = %err, "config read failed");
        self.errors.lock().push(err);
    }

    // ---- raw access ----

    /// Returns a copy of the value at `key`, walking nested values when path
    /// lookup is enabled.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.get_value(key, self.options.parse_key)
    }

    /// Like [`get`](Self::get) with explicit control over path lookup.
    pub fn get_value(&self, key: &str, find_by_path: bool) -> Option<Value> {
        self.resolve_with(key, find_by_path, |value| Ok(value.clone()))
    }

    /// Returns `true` whenever [`get`](Self::get) would find a value.
    pub fn exists(&self, key: &str) -> bool {
        self.exists_with(key, self.options.parse_key)
    }

    pub fn exists_with(&self, key: &str, find_by_path: bool) -> bool {
        let delimiter = self.options.delimiter;
        self.read(|data| resolve::exists(data, key, delimiter, find_by_path))
    }

    /// Snapshot of the whole configuration.
    pub fn data(&self) -> Mapping {
        self.read(Mapping::clone)
    }

    pub fn is_empty(&self) -> bool {
        self.read(Mapping::is_empty)
    }

    // ---- scalars ----

    /// Uncached text form, shared by the numeric and bool accessors.
    fn text(&self, key: &str) -> Option<String> {
        let parse_env = self.options.parse_env;
        self.resolve_with(key, self.options.parse_key, |value| {
            Ok(coerce::to_text(value, parse_env))
        })
    }

    /// Returns the value at `key` as text. Numbers and bools are formatted,
    /// string values are interpolated when `parse_env` is set.
    pub fn string(&self, key: &str) -> Option<String> {
        let parse_env = self.options.parse_env;
        self.cached(
            key,
            |c| &c.strings,
            |c| &mut c.strings,
            |value| Ok(coerce::to_text(value, parse_env)),
        )
    }

    pub fn string_or(&self, key: &str, default: &str) -> String {
        self.string(key).unwrap_or_else(|| default.to_string())
    }

    pub fn must_string(&self, key: &str) -> String {
        self.string(key).unwrap_or_default()
    }

    /// Parses the value at `key` as an `i32`.
    ///
    /// A value that is present but not an integer records an error and reads
    /// as `Some(0)`.
    pub fn int(&self, key: &str) -> Option<i32> {
        let text = self.text(key)?;
        Some(self.ok_or_record(coerce::parse_int(key, &text)).unwrap_or_default())
    }

    pub fn int_or(&self, key: &str, default: i32) -> i32 {
        self.int(key).unwrap_or(default)
    }

    pub fn must_int(&self, key: &str) -> i32 {
        self.int(key).unwrap_or_default()
    }

    /// Parses the value at `key` as an `i64`, with the same policy as [`int`](Self::int).
    pub fn int64(&self, key: &str) -> Option<i64> {
        let text = self.text(key)?;
        Some(self.ok_or_record(coerce::parse_int(key, &text)).unwrap_or_default())
    }

    pub fn int64_or(&self, key: &str, default: i64) -> i64 {
        self.int64(key).unwrap_or(default)
    }

    pub fn must_int64(&self, key: &str) -> i64 {
        self.int64(key).unwrap_or_default()
    }

    /// Parses the value at `key` as an `f64`, with the same policy as [`int`](Self::int).
    pub fn float(&self, key: &str) -> Option<f64> {
        let text = self.text(key)?;
        Some(self.ok_or_record(coerce::parse_float(key, &text)).unwrap_or_default())
    }

    pub fn float_or(&self, key: &str, default: f64) -> f64 {
        self.float(key).unwrap_or(default)
    }

    pub fn must_float(&self, key: &str) -> f64 {
        self.float(key).unwrap_or_default()
    }

    /// Reads the value at `key` as a bool.
    ///
    /// Unlike the numeric accessors, an unrecognized value is treated as not
    /// found: it records an error and returns `None`.
    pub fn bool(&self, key: &str) -> Option<bool> {
        let text = self.text(key)?;
        self.ok_or_record(coerce::parse_bool(key, &text))
    }

    pub fn bool_or(&self, key: &str, default: bool) -> bool {
        self.bool(key).unwrap_or(default)
    }

    pub fn must_bool(&self, key: &str) -> bool {
        self.bool(key).unwrap_or_default()
    }

    // ---- composites ----

    /// Reads an integer sequence. Untyped sequences are parsed element by
    /// element; one bad element fails the whole read.
    pub fn ints(&self, key: &str) -> Option<Vec<i64>> {
        self.resolve_with(key, self.options.parse_key, |value| coerce::to_ints(key, value))
    }

    pub fn ints_or(&self, key: &str, default: Vec<i64>) -> Vec<i64> {
        self.ints(key).unwrap_or(default)
    }

    pub fn must_ints(&self, key: &str) -> Vec<i64> {
        self.ints(key).unwrap_or_default()
    }

    pub fn int_map(&self, key: &str) -> Option<HashMap<String, i64>> {
        self.resolve_with(key, self.options.parse_key, |value| {
            coerce::to_int_map(key, value)
        })
    }

    pub fn int_map_or(&self, key: &str, default: HashMap<String, i64>) -> HashMap<String, i64> {
        self.int_map(key).unwrap_or(default)
    }

    pub fn must_int_map(&self, key: &str) -> HashMap<String, i64> {
        self.int_map(key).unwrap_or_default()
    }

    pub fn strings(&self, key: &str) -> Option<Vec<String>> {
        self.cached(
            key,
            |c| &c.string_slices,
            |c| &mut c.string_slices,
            |value| coerce::to_strings(key, value),
        )
    }

    pub fn strings_or(&self, key: &str, default: Vec<String>) -> Vec<String> {
        self.strings(key).unwrap_or(default)
    }

    pub fn must_strings(&self, key: &str) -> Vec<String> {
        self.strings(key).unwrap_or_default()
    }

    pub fn string_map(&self, key: &str) -> Option<HashMap<String, String>> {
        self.cached(
            key,
            |c| &c.string_maps,
            |c| &mut c.string_maps,
            |value| coerce::to_string_map(key, value),
        )
    }

    pub fn string_map_or(
        &self,
        key: &str,
        default: HashMap<String, String>,
    ) -> HashMap<String, String> {
        self.string_map(key).unwrap_or(default)
    }

    pub fn must_string_map(&self, key: &str) -> HashMap<String, String> {
        self.string_map(key).unwrap_or_default()
    }

    // ---- structure binding ----

    /// Deserializes the subtree at `key` into `T`. An empty key binds the
    /// whole configuration.
    ///
    /// Returns `Ok(None)` when `key` does not resolve.
    pub fn decode<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ConfigError> {
        let delimiter = self.options.delimiter;
        let encoded = self.read(|data| {
            if key.is_empty() {
                return Ok(serde_json::to_value(data));
            }
            resolve::lookup(data, key, delimiter, true).map(|value| serde_json::to_value(&*value))
        });

        let encoded = match encoded {
            Ok(encoded) => encoded,
            Err(err) => {
                tracing::debug!(key, error = %err, "nothing to bind");
                self.record(err);
                return Ok(None);
            }
        };

        let json = encoded.map_err(|source| ConfigError::Encode {
            key: key.to_string(),
            source,
        })?;
        serde_json::from_value(json)
            .map(Some)
            .map_err(|source| ConfigError::Decode {
                key: key.to_string(),
                source,
            })
    }

    /// Binds the subtree at `key` onto `dest`, leaving it untouched when the
    /// key does not resolve.
    pub fn structure<T: DeserializeOwned>(&self, key: &str, dest: &mut T) -> Result<(), ConfigError> {
        if let Some(value) = self.decode(key)? {
            *dest = value;
        }
        Ok(())
    }

    // ---- mutation ----

    /// Sets `key` to `value`.
    ///
    /// With path lookup enabled, a key containing the delimiter is written
    /// into nested maps, creating them as needed. Cached reads of the key,
    /// of anything below it, and of its parents are dropped.
    pub fn set(&self, key: &str, value: impl Into<Value>) -> Result<(), ConfigError> {
        let delimiter = self.options.delimiter;
        let key = format_key(key, delimiter);
        if key.is_empty() {
            return Err(ConfigError::InvalidKey);
        }

        {
            let mut data = self.data.write();
            self.ensure_writable()?;
            if self.options.parse_key && key.contains(delimiter) {
                let path: Vec<&str> = key.split(delimiter).collect();
                set_at_path(&mut data, &path, value.into());
            } else {
                data.insert(key.to_string(), value.into());
            }
            self.invalidate(key);
        }

        tracing::debug!(key, "config value set");
        self.notify(Event::SetValue {
            key: key.to_string(),
        });
        Ok(())
    }

    /// Replaces the whole configuration with `data` and clears all caches.
    pub fn set_data(&self, data: Mapping) -> Result<(), ConfigError> {
        {
            let mut current = self.data.write();
            self.ensure_writable()?;
            *current = data;
            self.clear_caches();
        }

        tracing::debug!("config data replaced");
        self.notify(Event::SetData);
        Ok(())
    }

    /// Calls the change hook, if any. Must run with no lock held.
    fn notify(&self, event: Event) {
        if let Some(hook) = &self.options.on_change {
            hook.call(&event, self);
        }
    }

    fn invalidate(&self, key: &str) {
        let delimiter = self.options.delimiter;
        let related = |cached: &str| {
            let cached = format_key(cached, delimiter);
            let nested = |outer: &str, inner: &str| {
                inner
                    .strip_prefix(outer)
                    .is_some_and(|rest| rest.starts_with(delimiter))
            };
            cached == key || nested(key, cached) || nested(cached, key)
        };
        self.caches.write().retain(|cached| !related(cached));
    }

    /// Deep-merges `data` into the configuration and clears all caches.
    pub fn load_data(&self, data: Mapping) -> Result<(), ConfigError> {
        let keys = data.len();
        {
            let mut current = self.data.write();
            self.ensure_writable()?;
            deep_merge(&mut current, data);
            self.clear_caches();
        }

        tracing::debug!(keys, "config data loaded");
        self.notify(Event::LoadData);
        Ok(())
    }

    /// Decodes `text` as `format` and merges it in.
    pub fn load_str(&self, format: Format, text: &str) -> Result<(), ConfigError> {
        self.load_data(parse_str(format, text)?)
    }

    /// Loads a required file; the format comes from its extension.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        match load_file(path.as_ref(), true)? {
            Some(data) => self.load_data(data),
            None => Ok(()),
        }
    }

    /// Loads files in order, later files overriding earlier ones.
    pub fn load_files<P: AsRef<Path>>(
        &self,
        paths: impl IntoIterator<Item = P>,
    ) -> Result<(), ConfigError> {
        for path in paths {
            self.load_file(path)?;
        }
        Ok(())
    }

    /// Loads a file if it exists.
    pub fn load_optional_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        match load_file(path.as_ref(), false)? {
            Some(data) => self.load_data(data),
            None => Ok(()),
        }
    }

    pub fn clear_caches(&self) {
        self.caches.write().clear();
    }

    /// Removes all data, caches and recorded errors.
    pub fn clear_all(&self) -> Result<(), ConfigError> {
        {
            let mut data = self.data.write();
            self.ensure_writable()?;
            data.clear();
            self.clear_caches();
            self.errors.lock().clear();
        }

        tracing::debug!("config data cleared");
        self.notify(Event::CleanData);
        Ok(())
    }

    /// Freezes the store. Later writes fail with [`ConfigError::Readonly`]
    /// and reads no longer take the lock.
    pub fn readonly(&self) {
        let mut data = self.data.write();
        if self.frozen.get().is_some() {
            return;
        }
        // Readers switch to the snapshot and writers are rejected from here
        // on, so the locked copy is never looked at again.
        if self.frozen.set(std::mem::take(&mut *data)).is_ok() {
            tracing::debug!("config is now readonly");
        }
    }

    pub fn is_readonly(&self) -> bool {
        self.frozen.get().is_some()
    }

    fn ensure_writable(&self) -> Result<(), ConfigError> {
        if self.is_readonly() {
            return Err(ConfigError::Readonly);
        }
        Ok(())
    }

    // ---- errors ----

    /// Drains the errors recorded by reads since the last call.
    pub fn take_errors(&self) -> Vec<ConfigError> {
        std::mem::take(&mut *self.errors.lock())
    }

    pub fn has_error(&self) -> bool {
        !self.errors.lock().is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.lock().len()
    }

    /// Message of the most recent recorded error.
    pub fn last_error(&self) -> Option<String> {
        self.errors.lock().last().map(ToString::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChangeHook;

    const JSON: &str = r#"{
        "age": 123,
        "debug": true,
        "name": "app",
        "map1": {"key1": "val1"},
        "arr1": ["val", "val1", "val2"]
    }"#;

    fn cached() -> Config {
        let config = Config::with_options(Options {
            enable_cache: true,
            ..Options::default()
        });
        config.load_str(Format::Json, JSON).unwrap();
        config
    }

    /// Mutates the data behind the store's back, leaving caches alone.
    fn poke(config: &Config, key: &str, value: Value) {
        config.data.write().insert(key.to_string(), value);
    }

    #[test]
    fn test_cached_families_return_stale_values() {
        let config = cached();
        assert_eq!(config.string("name").as_deref(), Some("app"));
        assert_eq!(config.must_strings("arr1"), vec!["val", "val1", "val2"]);
        assert_eq!(config.must_string_map("map1")["key1"], "val1");

        poke(&config, "name", Value::from("changed"));
        poke(&config, "arr1", Value::from(vec!["x"]));
        let mut map = HashMap::new();
        map.insert("key1".to_string(), "other".to_string());
        poke(&config, "map1", Value::StrMap(map));

        assert_eq!(config.string("name").as_deref(), Some("app"));
        assert_eq!(config.must_strings("arr1"), vec!["val", "val1", "val2"]);
        assert_eq!(config.must_string_map("map1")["key1"], "val1");
    }

    #[test]
    fn test_numeric_reads_are_never_cached() {
        let config = cached();
        assert_eq!(config.string("age").as_deref(), Some("123"));
        assert_eq!(config.int("age"), Some(123));
        assert_eq!(config.bool("debug"), Some(true));

        poke(&config, "age", Value::from(7));
        poke(&config, "debug", Value::from("no"));

        assert_eq!(config.int("age"), Some(7));
        assert_eq!(config.int64("age"), Some(7));
        assert_eq!(config.float("age"), Some(7.0));
        assert_eq!(config.bool("debug"), Some(false));
        assert_eq!(config.string("age").as_deref(), Some("123"));
    }

    #[test]
    fn test_failed_reads_are_not_cached() {
        let config = cached();
        assert_eq!(config.strings("name"), None);
        assert!(config.caches.read().string_slices.is_empty());
        assert_eq!(config.string("missing"), None);
        assert!(config.caches.read().strings.is_empty());
    }

    #[test]
    fn test_reload_clears_caches() {
        let config = cached();
        assert_eq!(config.string("name").as_deref(), Some("app"));

        config.load_str(Format::Json, r#"{"name": "next"}"#).unwrap();
        assert_eq!(config.string("name").as_deref(), Some("next"));
    }

    #[test]
    fn test_set_invalidates_related_cache_entries() {
        let config = cached();
        assert_eq!(config.string("map1.key1").as_deref(), Some("val1"));
        assert_eq!(config.must_string_map("map1")["key1"], "val1");
        assert_eq!(config.string("name").as_deref(), Some("app"));

        config.set("map1.key1", "new").unwrap();
        assert_eq!(config.string("map1.key1").as_deref(), Some("new"));
        assert_eq!(config.must_string_map("map1")["key1"], "new");

        poke(&config, "name", Value::from("untouched"));
        config.set("map1", "scalar").unwrap();
        assert_eq!(config.string("name").as_deref(), Some("app"));
        assert_eq!(config.string("map1.key1"), None);
    }

    #[test]
    fn test_cache_disabled_by_default() {
        let config = Config::new();
        config.load_str(Format::Json, JSON).unwrap();
        assert_eq!(config.string("name").as_deref(), Some("app"));
        poke(&config, "name", Value::from("changed"));
        assert_eq!(config.string("name").as_deref(), Some("changed"));
    }

    #[test]
    fn test_readonly_rejects_writes_and_keeps_reading() {
        let config = Config::new();
        config.load_str(Format::Json, JSON).unwrap();
        config.readonly();

        assert!(config.is_readonly());
        assert!(matches!(config.set("name", "x"), Err(ConfigError::Readonly)));
        assert!(matches!(config.load_data(Mapping::new()), Err(ConfigError::Readonly)));
        assert!(matches!(config.clear_all(), Err(ConfigError::Readonly)));
        assert_eq!(config.string("map1.key1").as_deref(), Some("val1"));
        assert!(config.exists("arr1.2"));
    }

    #[test]
    fn test_clear_all_resets_everything() {
        let config = cached();
        config.int("name");
        assert!(config.has_error());

        config.clear_all().unwrap();
        assert!(config.is_empty());
        assert!(!config.has_error());
        assert_eq!(config.string("name"), None);
    }

    #[test]
    fn test_concurrent_reads_and_cache_fills() {
        let config = std::sync::Arc::new(cached());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let config = config.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        assert_eq!(config.string("name").as_deref(), Some("app"));
                        assert!(config.string(&format!("arr1.{}", i % 3)).is_some());
                        assert_eq!(config.int("age"), Some(123));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(config.caches.read().strings.len(), 4);
    }

    #[test]
    fn test_cache_never_outlives_a_concurrent_load() {
        let config = std::sync::Arc::new(cached());
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let config = config.clone();
                std::thread::spawn(move || {
                    for _ in 0..500 {
                        config.string("name");
                        config.strings("arr1");
                    }
                })
            })
            .collect();

        for i in 0..200 {
            let mut data = Mapping::new();
            data.insert("name".into(), Value::from(i.to_string()));
            data.insert("arr1".into(), Value::from(vec![i.to_string()]));
            config.load_data(data).unwrap();
        }
        for reader in readers {
            reader.join().unwrap();
        }

        assert_eq!(config.string("name").as_deref(), Some("199"));
        assert_eq!(config.strings("arr1"), Some(vec!["199".to_string()]));
    }

    #[test]
    fn test_with_options_readonly_freezes_immediately() {
        let config = Config::with_options(Options {
            readonly: true,
            ..Options::default()
        });

        assert!(config.is_readonly());
        assert!(matches!(config.set("name", "x"), Err(ConfigError::Readonly)));
        assert!(matches!(
            config.load_str(Format::Json, JSON),
            Err(ConfigError::Readonly)
        ));
        assert!(config.is_empty());
    }

    #[test]
    fn test_readonly_moves_data_into_the_snapshot() {
        let config = Config::new();
        config.load_str(Format::Json, JSON).unwrap();
        let before = config.data();

        config.readonly();
        config.readonly();

        assert!(config.data.read().is_empty());
        assert_eq!(config.data(), before);
        assert_eq!(config.int("age"), Some(123));
    }

    #[test]
    fn test_set_data_replaces_everything() {
        let config = cached();
        assert_eq!(config.string("name").as_deref(), Some("app"));

        let mut data = Mapping::new();
        data.insert("only".into(), Value::from(1));
        config.set_data(data).unwrap();

        assert_eq!(config.string("name"), None);
        assert_eq!(config.int("only"), Some(1));
    }

    #[test]
    fn test_change_hook_fires_after_each_write() {
        use std::sync::Arc;

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let config = Config::with_options(Options {
            on_change: Some(ChangeHook::new(move |event, config| {
                // Reading back from the hook must not deadlock.
                sink.lock().push((event.clone(), config.is_empty()));
            })),
            ..Options::default()
        });

        config.load_str(Format::Json, JSON).unwrap();
        config.set("map1.key2", "v").unwrap();
        config.set_data(Mapping::new()).unwrap();
        config.clear_all().unwrap();
        config.readonly();
        assert!(config.set("name", "x").is_err());

        assert_eq!(
            *seen.lock(),
            vec![
                (Event::LoadData, false),
                (
                    Event::SetValue {
                        key: "map1.key2".into()
                    },
                    false
                ),
                (Event::SetData, true),
                (Event::CleanData, true),
            ]
        );
    }

    #[test]
    fn test_plain_misses_are_not_recorded() {
        let config = cached();
        assert_eq!(config.string("missing"), None);
        assert_eq!(config.string("map1.missing"), None);
        assert!(!config.has_error());

        assert_eq!(config.string("arr1.9"), None);
        assert_eq!(config.string("name.x"), None);
        assert!(matches!(
            config.take_errors().as_slice(),
            [ConfigError::BadIndex { .. }, ConfigError::NotTraversable { .. }]
        ));
    }
}
