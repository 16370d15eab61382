//! Configuration module
//!
//! Settings for the backend connection, event defaults and logging, read from
//! an optional `config.toml` and `EVENTHUB__*` environment variables.

pub mod settings;
pub mod validation;

pub use settings::{Settings, BackendConfig, EventsConfig, LoggingConfig};
