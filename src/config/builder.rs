use std::path::{Path, PathBuf};

use super::decode::{parse_str, Format};
use super::options::{ChangeHook, Event, Options};
use super::value::Mapping;
use super::{Config, ConfigError};

/// A source applied when the store is built.
#[derive(Debug)]
enum ConfigSource {
    File { path: PathBuf, required: bool },
    Text { format: Format, text: String },
    Data(Mapping),
}

/// Builder for a [`Config`] store.
///
/// Sources are merged in registration order, with later sources overriding
/// earlier ones. Nested maps are merged recursively; other values
/// (including sequences) are replaced entirely.
///
/// ## Example
///
/// ```no_run
/// use confpath::Config;
///
/// let config = Config::builder()
///     .parse_env(true)
///     .enable_cache(true)
///     .with_file("config/default.toml", true)
///     .with_file("config/local.yaml", false)
///     .readonly(true)
///     .build()?;
///
/// let port = config.int_or("server.port", 8080);
/// # Ok::<(), confpath::ConfigError>(())
/// ```
#[derive(Debug, Default)]
#[must_use = "builders do nothing until .build() is called"]
pub struct ConfigBuilder {
    options: Options,
    sources: Vec<ConfigSource>,
}

impl ConfigBuilder {
    /// Replaces all options at once.
    pub fn options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Expands `${NAME}` / `${NAME|default}` tokens in string values on read.
    pub fn parse_env(mut self, enabled: bool) -> Self {
        self.options.parse_env = enabled;
        self
    }

    pub fn enable_cache(mut self, enabled: bool) -> Self {
        self.options.enable_cache = enabled;
        self
    }

    /// Disables or enables walking into nested values by key path.
    pub fn parse_key(mut self, enabled: bool) -> Self {
        self.options.parse_key = enabled;
        self
    }

    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.options.delimiter = delimiter;
        self
    }

    /// Freezes the store after all sources are loaded.
    pub fn readonly(mut self, enabled: bool) -> Self {
        self.options.readonly = enabled;
        self
    }

    /// Registers a callback fired after every change to the data, including
    /// the loads done by [`build`](Self::build).
    pub fn on_change(mut self, hook: impl Fn(&Event, &Config) + Send + Sync + 'static) -> Self {
        self.options.on_change = Some(ChangeHook::new(hook));
        self
    }

    /// Adds a config file; the format comes from its extension.
    ///
    /// If `required` is `true`, the build will fail if the file doesn't exist.
    /// Optional files that are missing are silently skipped.
    pub fn with_file(mut self, path: impl AsRef<Path>, required: bool) -> Self {
        self.sources.push(ConfigSource::File {
            path: path.as_ref().to_path_buf(),
            required,
        });
        self
    }

    /// Adds an in-memory document, decoded at build time.
    pub fn with_str(mut self, format: Format, text: impl Into<String>) -> Self {
        self.sources.push(ConfigSource::Text {
            format,
            text: text.into(),
        });
        self
    }

    /// Adds already-built data.
    pub fn with_data(mut self, data: Mapping) -> Self {
        self.sources.push(ConfigSource::Data(data));
        self
    }

    /// Builds the store by loading and merging every source.
    pub fn build(self) -> Result<Config, ConfigError> {
        let readonly = self.options.readonly;
        let config = Config::writable(self.options);

        for source in self.sources {
            match source {
                ConfigSource::File { path, required } if required => config.load_file(&path)?,
                ConfigSource::File { path, .. } => config.load_optional_file(&path)?,
                ConfigSource::Text { format, text } => config.load_data(parse_str(format, &text)?)?,
                ConfigSource::Data(data) => config.load_data(data)?,
            }
        }

        if readonly {
            config.readonly();
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Value;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_later_sources_override_earlier() {
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[server]\nhost = \"file\"\nport = 1").unwrap();

        let mut overrides = Mapping::new();
        overrides.insert("debug".into(), Value::from(true));

        let config = Config::builder()
            .with_file(file.path(), true)
            .with_str(Format::Json, r#"{"server": {"port": 2}}"#)
            .with_data(overrides)
            .build()
            .unwrap();

        assert_eq!(config.string("server.host").as_deref(), Some("file"));
        assert_eq!(config.int("server.port"), Some(2));
        assert_eq!(config.bool("debug"), Some(true));
    }

    #[test]
    fn test_optional_missing_file_is_skipped() {
        let config = Config::builder()
            .with_file("/nonexistent/path/config.yaml", false)
            .build()
            .unwrap();
        assert!(config.is_empty());
    }

    #[test]
    fn test_required_missing_file_fails() {
        let result = Config::builder()
            .with_file("/nonexistent/path/config.yaml", true)
            .build();
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_options_are_applied() {
        let config = Config::builder()
            .delimiter(':')
            .parse_key(true)
            .readonly(true)
            .with_str(Format::Json, r#"{"a": {"b": 1}}"#)
            .build()
            .unwrap();

        assert_eq!(config.options().delimiter, ':');
        assert!(config.is_readonly());
        assert_eq!(config.int("a:b"), Some(1));
        assert_eq!(config.int("a.b"), None);
    }

    #[test]
    fn test_on_change_sees_build_loads() {
        use std::sync::{Arc, Mutex};

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let config = Config::builder()
            .on_change(move |event, config| {
                sink.lock().unwrap().push((event.name(), config.data().len()));
            })
            .with_str(Format::Json, r#"{"a": 1}"#)
            .with_str(Format::Json, r#"{"b": 2}"#)
            .build()
            .unwrap();

        config.set("c", 3).unwrap();
        assert_eq!(
            *seen.lock().unwrap(),
            vec![("load.data", 1), ("load.data", 2), ("set.value", 3)]
        );
    }

    #[test]
    fn test_yaml_sources_merge_nested_maps() {
        let config = Config::builder()
            .with_str(Format::Yaml, "db:\n  host: a\n  port: 1\n")
            .with_str(Format::Yaml, "db:\n  port: 2\n")
            .build()
            .unwrap();

        assert_eq!(config.string("db.host").as_deref(), Some("a"));
        assert_eq!(config.int("db.port"), Some(2));
    }
}
