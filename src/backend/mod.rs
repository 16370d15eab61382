//! Backend module
//!
//! This module handles the connection to the hosted backend: the auth API and
//! the row API behind it

pub mod auth;
pub mod connection;
pub mod repositories;
pub mod service;

// Re-export commonly used backend components
pub use auth::AuthClient;
pub use connection::BackendClient;
pub use repositories::{ProfileRepository, EventRepository, RegistrationRepository};
pub use service::BackendService;
