//! Services module
//!
//! The stateful stores the rest of the application reads from: who is signed
//! in, which events exist, and what the user registered for.

pub mod session;
pub mod events;
pub mod registrations;

// Re-export commonly used services
pub use session::{SessionStore, AuthState};
pub use events::EventStore;
pub use registrations::RegistrationStore;
