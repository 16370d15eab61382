//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod user;
pub mod event;
pub mod registration;
pub mod session;

// Re-export commonly used models
pub use user::{User, Role};
pub use event::{Event, EventStatus, EventDraft, NewEventRow, EventChanges};
pub use registration::{Registration, RegistrationRow, RegistrationStatus, NewRegistrationRow, Attendee};
pub use session::{AuthUser, Session, TokenResponse, SignUpResponse, AuthChange};
