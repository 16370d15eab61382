//! Registration repository implementation

use std::time::Instant;

use reqwest::Method;
use serde::Deserialize;
use uuid::Uuid;

use super::record;
use crate::backend::connection::{send_json, BackendClient};
use crate::models::registration::{Attendee, NewRegistrationRow, RegistrationRow};
use crate::utils::errors::{BackendError, Result};

const TABLE: &str = "registrations";

/// Shape of `select=profiles:user_id(name)`
#[derive(Debug, Deserialize)]
struct AttendeeRow {
    profiles: Option<Attendee>,
}

#[derive(Debug, Clone)]
pub struct RegistrationRepository {
    client: BackendClient,
}

impl RegistrationRepository {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    /// All registrations made by a user
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<RegistrationRow>> {
        let started = Instant::now();
        let result = send_json::<Vec<RegistrationRow>>(
            self.client
                .rest(Method::GET, TABLE)
                .query(&[("select", "*".to_string()), ("user_id", format!("eq.{}", user_id))]),
        )
        .await;

        record("select", TABLE, started, result)
    }

    /// Register a user for an event
    pub async fn create(&self, row: &NewRegistrationRow) -> Result<RegistrationRow> {
        let started = Instant::now();
        let result = send_json::<Vec<RegistrationRow>>(
            self.client
                .rest(Method::POST, TABLE)
                .header("Prefer", "return=representation")
                .json(&[row]),
        )
        .await
        .and_then(|rows| {
            rows.into_iter()
                .next()
                .ok_or_else(|| BackendError::InvalidResponse("insert returned no row".to_string()))
        });

        record("insert", TABLE, started, result)
    }

    /// Names of everyone registered for an event
    pub async fn list_attendees(&self, event_id: Uuid) -> Result<Vec<Attendee>> {
        let started = Instant::now();
        let result = send_json::<Vec<AttendeeRow>>(
            self.client.rest(Method::GET, TABLE).query(&[
                ("select", "profiles:user_id(name)".to_string()),
                ("event_id", format!("eq.{}", event_id)),
            ]),
        )
        .await;

        Ok(record("select", TABLE, started, result)?
            .into_iter()
            .filter_map(|row| row.profiles)
            .collect())
    }
}
