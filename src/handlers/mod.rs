//! Handlers module
//!
//! This module turns command-line input into calls on the application state
//! and renders the results as text

pub mod commands;

pub use commands::{execute, Command};
