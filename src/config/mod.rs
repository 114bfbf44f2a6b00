//! Configuration store, key path resolution and typed accessors.

mod builder;
mod coerce;
mod decode;
mod env;
mod error;
mod file;
mod merge;
mod options;
mod resolve;
mod store;
mod value;

pub use builder::ConfigBuilder;
pub use decode::{parse_str, Format};
pub use env::interpolate;
pub use error::ConfigError;
pub use options::{ChangeHook, Event, Options};
pub use store::Config;
pub use value::{Key, Mapping, Value};
