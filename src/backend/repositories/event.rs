//! Event repository implementation

use std::time::Instant;

use reqwest::Method;
use serde_json::json;
use uuid::Uuid;

use super::record;
use crate::backend::connection::{send, send_json, BackendClient};
use crate::models::event::{Event, EventChanges, NewEventRow};
use crate::utils::errors::{BackendError, Result};

const TABLE: &str = "events";

#[derive(Debug, Clone)]
pub struct EventRepository {
    client: BackendClient,
}

impl EventRepository {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    /// List all events, earliest first
    pub async fn list(&self) -> Result<Vec<Event>> {
        let started = Instant::now();
        let result = send_json::<Vec<Event>>(
            self.client
                .rest(Method::GET, TABLE)
                .query(&[("select", "*"), ("order", "date.asc")]),
        )
        .await;

        record("select", TABLE, started, result)
    }

    /// Find event by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>> {
        let started = Instant::now();
        let result = send_json::<Vec<Event>>(
            self.client
                .rest(Method::GET, TABLE)
                .query(&[("select", "*".to_string()), ("id", format!("eq.{}", id))]),
        )
        .await;

        Ok(record("select", TABLE, started, result)?.into_iter().next())
    }

    /// Insert one event and return the stored row
    pub async fn create(&self, row: &NewEventRow) -> Result<Event> {
        let started = Instant::now();
        let result = send_json::<Vec<Event>>(
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

    /// Overwrite every mutable column of an event
    pub async fn update(&self, id: Uuid, changes: &EventChanges) -> Result<()> {
        let started = Instant::now();
        let result = send(
            self.client
                .rest(Method::PATCH, TABLE)
                .query(&[("id", format!("eq.{}", id))])
                .header("Prefer", "return=minimal")
                .json(changes),
        )
        .await
        .map(|_| ());

        record("update", TABLE, started, result)
    }

    /// Take one seat if the count is still `expected`
    ///
    /// The filter on `registered_count` makes the increment a compare-and-set:
    /// `None` means someone else changed the count first.
    pub async fn claim_seat(&self, id: Uuid, expected: i32) -> Result<Option<Event>> {
        self.swap_count(id, expected, expected + 1, "claim_seat").await
    }

    /// Give back a seat taken by [`claim_seat`](Self::claim_seat)
    pub async fn release_seat(&self, id: Uuid, held: i32) -> Result<bool> {
        Ok(self.swap_count(id, held, held - 1, "release_seat").await?.is_some())
    }

    async fn swap_count(&self, id: Uuid, from: i32, to: i32, operation: &str) -> Result<Option<Event>> {
        let started = Instant::now();
        let result = send_json::<Vec<Event>>(
            self.client
                .rest(Method::PATCH, TABLE)
                .query(&[
                    ("id", format!("eq.{}", id)),
                    ("registered_count", format!("eq.{}", from)),
                ])
                .header("Prefer", "return=representation")
                .json(&json!({ "registered_count": to })),
        )
        .await;

        Ok(record(operation, TABLE, started, result)?.into_iter().next())
    }
}
