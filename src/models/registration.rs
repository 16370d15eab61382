//! Registration model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use std::fmt;
use uuid::Uuid;

/// A `registrations` row as the backend returns it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationRow {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    /// Older schemas have no status column
    #[serde(default)]
    pub status: Option<RegistrationStatus>,
    pub created_at: DateTime<Utc>,
}

/// A user's application to an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub status: RegistrationStatus,
    pub applied_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewRegistrationRow {
    pub event_id: Uuid,
    pub user_id: Uuid,
}

/// Someone registered for an event, as shown on the event page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendee {
    pub name: String,
}

impl From<RegistrationRow> for Registration {
    fn from(row: RegistrationRow) -> Self {
        Self {
            id: row.id,
            event_id: row.event_id,
            user_id: row.user_id,
            status: row.status.unwrap_or(RegistrationStatus::Approved),
            applied_at: row.created_at,
        }
    }
}

impl fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistrationStatus::Pending => write!(f, "pending"),
            RegistrationStatus::Approved => write!(f, "approved"),
            RegistrationStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl RegistrationStatus {
    pub fn message(&self) -> &'static str {
        match self {
            RegistrationStatus::Approved => "Your registration has been approved.",
            RegistrationStatus::Rejected => "Your registration was not accepted.",
            RegistrationStatus::Pending => "Your registration is awaiting review.",
        }
    }
}
