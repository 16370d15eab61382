//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{EventHubError, Result};
use crate::utils::helpers::is_valid_http_url;
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_backend_config(&settings.backend)?;
    validate_events_config(&settings.events)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate backend configuration
fn validate_backend_config(config: &super::BackendConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(EventHubError::Config(
            "Backend URL is required".to_string()
        ));
    }

    if !is_valid_http_url(&config.url) {
        return Err(EventHubError::Config(
            format!("Backend URL is not a valid http(s) URL: {}", config.url)
        ));
    }

    if config.anon_key.is_empty() {
        return Err(EventHubError::Config(
            "Backend anon key is required".to_string()
        ));
    }

    if config.timeout_seconds == 0 {
        return Err(EventHubError::Config(
            "Backend timeout must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate event settings
fn validate_events_config(config: &super::EventsConfig) -> Result<()> {
    if config.default_capacity <= 0 {
        return Err(EventHubError::Config(
            "Default capacity must be greater than 0".to_string()
        ));
    }

    if config.claim_attempts == 0 {
        return Err(EventHubError::Config(
            "Seat claim attempts must be greater than 0".to_string()
        ));
    }

    if !is_valid_http_url(&config.default_image) {
        return Err(EventHubError::Config(
            "Default image must be a valid http(s) URL".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(EventHubError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(EventHubError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}
