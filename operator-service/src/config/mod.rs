// Config Module
// Dynamic values, ordered task configs and expansion settings

pub mod params;
pub mod settings;
pub mod value;

pub use params::{Config, ConfigError};
pub use settings::{ExpansionSettings, NameEncoding};
pub use value::{DecodeError, Value};
