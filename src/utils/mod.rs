//! Utility modules
//!
//! Error types, logging setup and the small formatting and validation helpers
//! shared by the rest of the crate.

pub mod errors;
pub mod logging;
pub mod helpers;

pub use errors::{EventHubError, BackendError, ValidationErrors, Result};
