pub mod config;
pub mod global;

pub use config::{
    interpolate, parse_str, ChangeHook, Config, ConfigBuilder, ConfigError, Event, Format, Key,
    Mapping, Options, Value,
};
pub use global::global;
