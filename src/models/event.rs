//! Event model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::utils::errors::{Result, ValidationErrors};
use crate::utils::helpers::is_valid_http_url;

/// An `events` row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    pub date: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub location: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub image: String,
    pub organizer_id: Uuid,
    pub capacity: i32,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub registered_count: i32,
    pub status: EventStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Upcoming,
    Present,
    Past,
}

/// Organizer input for a new event
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub image: String,
    pub capacity: i32,
}

/// Row body sent when inserting an event
#[derive(Debug, Clone, Serialize)]
pub struct NewEventRow {
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub image: String,
    pub organizer_id: Uuid,
    pub capacity: i32,
    pub registered_count: i32,
    pub status: EventStatus,
}

/// Every mutable column of an event, written as a whole on update
#[derive(Debug, Clone, Serialize)]
pub struct EventChanges {
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub image: String,
    pub organizer_id: Uuid,
    pub capacity: i32,
    pub registered_count: i32,
    pub status: EventStatus,
}

fn null_as_zero<'de, D>(deserializer: D) -> std::result::Result<i32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<i32>::deserialize(deserializer)?.unwrap_or(0))
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Event {
    pub fn seats_left(&self) -> i32 {
        (self.capacity - self.registered_count).max(0)
    }

    pub fn is_full(&self) -> bool {
        self.registered_count >= self.capacity
    }
}

impl From<&Event> for EventChanges {
    fn from(event: &Event) -> Self {
        Self {
            title: event.title.clone(),
            description: event.description.clone(),
            date: event.date,
            location: event.location.clone(),
            image: event.image.clone(),
            organizer_id: event.organizer_id,
            capacity: event.capacity,
            registered_count: event.registered_count,
            status: event.status,
        }
    }
}

impl EventDraft {
    /// Check every required field, reporting all failures at once
    pub fn validate(&self) -> Result<()> {
        field_errors(&self.title, &self.description, &self.location, &self.image, self.capacity)
            .into_result()
    }
}

impl EventChanges {
    pub fn validate(&self) -> Result<()> {
        let mut errors =
            field_errors(&self.title, &self.description, &self.location, &self.image, self.capacity);

        if self.registered_count < 0 {
            errors.add("registered_count", "Registered count cannot be negative");
        }

        errors.into_result()
    }
}

fn field_errors(
    title: &str,
    description: &str,
    location: &str,
    image: &str,
    capacity: i32,
) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if title.trim().is_empty() {
        errors.add("title", "Title is required");
    }
    if description.trim().is_empty() {
        errors.add("description", "Description is required");
    }
    if location.trim().is_empty() {
        errors.add("location", "Location is required");
    }
    if capacity <= 0 {
        errors.add("capacity", "Capacity must be greater than 0");
    }
    if image.trim().is_empty() {
        errors.add("image", "Image URL is required");
    } else if !is_valid_http_url(image) {
        errors.add("image", "Image URL must be a valid http(s) URL");
    }

    errors
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventStatus::Upcoming => write!(f, "upcoming"),
            EventStatus::Present => write!(f, "present"),
            EventStatus::Past => write!(f, "past"),
        }
    }
}

impl FromStr for EventStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "upcoming" => Ok(EventStatus::Upcoming),
            "present" => Ok(EventStatus::Present),
            "past" => Ok(EventStatus::Past),
            other => Err(format!("Unknown event status: {}", other)),
        }
    }
}

impl EventStatus {
    /// Label shown to people browsing events
    pub fn label(&self) -> &'static str {
        match self {
            EventStatus::Upcoming => "Upcoming",
            EventStatus::Present => "Happening Now",
            EventStatus::Past => "Past",
        }
    }
}
