//! Error handling for EventHub
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;
use uuid::Uuid;

use crate::models::Role;

/// Main error type for EventHub
#[derive(Error, Debug)]
pub enum EventHubError {
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("User not authenticated")]
    NotAuthenticated,

    #[error("Invalid role for this account")]
    RoleMismatch { expected: Role, actual: Option<Role> },

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Event not found: {event_id}")]
    EventNotFound { event_id: Uuid },

    #[error("Event is at full capacity ({capacity} seats)")]
    EventAtCapacity { event_id: Uuid, capacity: i32 },

    #[error("Already registered for event {event_id}")]
    AlreadyRegistered { event_id: Uuid },

    #[error("Could not claim a seat for event {event_id} after {attempts} attempts")]
    RegistrationConflict { event_id: Uuid, attempts: u32 },
}

/// Errors reported by the hosted backend or the transport in front of it
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Backend request failed: {0}")]
    RequestFailed(String),

    #[error("Backend timeout")]
    Timeout,

    #[error("Backend unavailable")]
    Unavailable,

    #[error("Backend returned HTTP {status}: {message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("Invalid backend response: {0}")]
    InvalidResponse(String),
}

impl BackendError {
    /// Whether the backend rejected a write because of a unique constraint
    pub fn is_unique_violation(&self) -> bool {
        match self {
            BackendError::Api { status, code, .. } => {
                *status == 409 || code.as_deref() == Some("23505")
            }
            _ => false,
        }
    }
}

/// Field-level validation messages, keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<&'static str, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }

    /// Turn collected messages into a result
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(EventHubError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

/// Result type alias for EventHub operations
pub type Result<T> = std::result::Result<T, EventHubError>;

/// Result type alias for raw backend operations
pub type BackendResult<T> = std::result::Result<T, BackendError>;

impl EventHubError {
    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            EventHubError::Backend(BackendError::Api { status, .. }) => *status >= 500,
            EventHubError::Backend(BackendError::InvalidResponse(_)) => false,
            EventHubError::Backend(_) => true,
            EventHubError::Http(_) => true,
            EventHubError::Serialization(_) => false,
            EventHubError::Io(_) => true,
            EventHubError::UrlParse(_) => false,
            EventHubError::Config(_) => false,
            EventHubError::NotAuthenticated => false,
            EventHubError::RoleMismatch { .. } => false,
            EventHubError::Authentication(_) => false,
            EventHubError::PermissionDenied(_) => false,
            EventHubError::Validation(_) => false,
            EventHubError::InvalidInput(_) => false,
            EventHubError::EventNotFound { .. } => false,
            EventHubError::EventAtCapacity { .. } => false,
            EventHubError::AlreadyRegistered { .. } => false,
            EventHubError::RegistrationConflict { .. } => true,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            EventHubError::Config(_) => ErrorSeverity::Critical,
            EventHubError::NotAuthenticated => ErrorSeverity::Warning,
            EventHubError::RoleMismatch { .. } => ErrorSeverity::Warning,
            EventHubError::Authentication(_) => ErrorSeverity::Warning,
            EventHubError::PermissionDenied(_) => ErrorSeverity::Warning,
            EventHubError::Validation(_) => ErrorSeverity::Info,
            EventHubError::InvalidInput(_) => ErrorSeverity::Info,
            EventHubError::EventAtCapacity { .. } => ErrorSeverity::Info,
            EventHubError::AlreadyRegistered { .. } => ErrorSeverity::Info,
            EventHubError::EventNotFound { .. } => ErrorSeverity::Warning,
            EventHubError::RegistrationConflict { .. } => ErrorSeverity::Warning,
            _ => ErrorSeverity::Error,
        }
    }

    /// Which part of the error taxonomy this error belongs to
    pub fn category(&self) -> ErrorCategory {
        match self {
            EventHubError::NotAuthenticated
            | EventHubError::RoleMismatch { .. }
            | EventHubError::Authentication(_)
            | EventHubError::PermissionDenied(_) => ErrorCategory::Authentication,
            EventHubError::Validation(_) | EventHubError::InvalidInput(_) => {
                ErrorCategory::Validation
            }
            EventHubError::EventNotFound { .. }
            | EventHubError::EventAtCapacity { .. }
            | EventHubError::AlreadyRegistered { .. }
            | EventHubError::RegistrationConflict { .. } => ErrorCategory::Domain,
            EventHubError::Config(_) => ErrorCategory::Configuration,
            _ => ErrorCategory::Transport,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Broad error families shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Authentication,
    Validation,
    Domain,
    Transport,
    Configuration,
}

impl ErrorCategory {
    /// Process exit status the command line reports for this family
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorCategory::Validation => 2,
            ErrorCategory::Authentication => 3,
            ErrorCategory::Domain => 4,
            ErrorCategory::Transport => 5,
            ErrorCategory::Configuration => 6,
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Authentication => write!(f, "authentication"),
            ErrorCategory::Validation => write!(f, "validation"),
            ErrorCategory::Domain => write!(f, "domain"),
            ErrorCategory::Transport => write!(f, "transport"),
            ErrorCategory::Configuration => write!(f, "configuration"),
        }
    }
}
