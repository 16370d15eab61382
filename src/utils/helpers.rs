//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use regex::Regex;
use std::sync::OnceLock;

use crate::utils::errors::{EventHubError, Result};

/// Format a timestamp for display
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Long calendar date, e.g. "Monday, June 15, 2026"
pub fn format_event_date(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%A, %B %-d, %Y").to_string()
}

/// Clock time, e.g. "09:00 AM"
pub fn format_event_time(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%I:%M %p").to_string()
}

/// Combine separate date (`YYYY-MM-DD`) and time (`HH:MM`) inputs into a UTC timestamp
pub fn parse_form_datetime(date: &str, time: &str) -> Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| EventHubError::InvalidInput(format!("Invalid date: {}", date)))?;
    let time = NaiveTime::parse_from_str(time.trim(), "%H:%M")
        .map_err(|_| EventHubError::InvalidInput(format!("Invalid time: {}", time)))?;

    Ok(date.and_time(time).and_utc())
}

/// Truncate text to a maximum length with ellipsis
pub fn truncate_text(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_length.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Loose email shape check, the provider does the real verification
pub fn is_valid_email(email: &str) -> bool {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    let re = EMAIL.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
    });
    re.is_match(email.trim())
}

/// Whether a string parses as an absolute http(s) URL
pub fn is_valid_http_url(value: &str) -> bool {
    match url::Url::parse(value.trim()) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.has_host(),
        Err(_) => false,
    }
}
