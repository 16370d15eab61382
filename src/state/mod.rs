//! State management module
//!
//! This module holds the application-wide state object

pub mod app;

// Re-export commonly used state components
pub use app::AppState;
