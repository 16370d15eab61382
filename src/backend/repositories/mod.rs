//! Table repositories
//!
//! Stateless accessors for the `profiles`, `events` and `registrations` tables.

pub mod profile;
pub mod event;
pub mod registration;

pub use profile::ProfileRepository;
pub use event::EventRepository;
pub use registration::RegistrationRepository;

use std::time::Instant;

use crate::utils::errors::{BackendResult, Result};
use crate::utils::logging::log_backend_operation;

/// Log how a table operation went and lift its error into the crate error
pub(crate) fn record<T>(
    operation: &str,
    table: &str,
    started: Instant,
    result: BackendResult<T>,
) -> Result<T> {
    let duration_ms = started.elapsed().as_millis() as u64;
    log_backend_operation(operation, table, duration_ms, result.is_ok());
    Ok(result?)
}
