//! File-based configuration loading.

use std::path::Path;

use super::decode::{parse_str, Format};
use super::value::Mapping;
use super::ConfigError;

/// Loads and decodes a config file, picking the format from its extension.
///
/// Returns `Ok(None)` if the file doesn't exist and `required` is false.
pub(crate) fn load_file(path: &Path, required: bool) -> Result<Option<Mapping>, ConfigError> {
    let format =
        Format::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat(path.to_path_buf()))?;

    match std::fs::read_to_string(path) {
        Ok(contents) => {
            let data = parse_str(format, &contents).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                source: Box::new(e),
            })?;
            tracing::debug!(path = %path.display(), %format, keys = data.len(), "loaded config file");
            Ok(Some(data))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            if required {
                Err(ConfigError::FileNotFound(path.to_path_buf()))
            } else {
                Ok(None)
            }
        }
        Err(e) => Err(ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}
