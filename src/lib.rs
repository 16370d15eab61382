//! EventHub
//!
//! Client core of an event discovery and registration application. Identity,
//! events and registrations live in a hosted backend; this library keeps the
//! signed-in session, caches events and registrations, derives the views the
//! UI needs, and guards event capacity with an atomic seat claim.

pub mod backend;
pub mod config;
pub mod derivation;
pub mod handlers;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{EventHubError, Result};

// Re-export main components for easy access
pub use backend::BackendService;
pub use services::{EventStore, RegistrationStore, SessionStore};
pub use state::AppState;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
