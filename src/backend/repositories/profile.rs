//! Profile repository implementation

use std::time::Instant;

use reqwest::Method;
use uuid::Uuid;

use super::record;
use crate::backend::connection::{send_json, BackendClient};
use crate::models::User;
use crate::utils::errors::Result;

const TABLE: &str = "profiles";

#[derive(Debug, Clone)]
pub struct ProfileRepository {
    client: BackendClient,
}

impl ProfileRepository {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    /// Find the profile linked to an auth user
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let started = Instant::now();
        let result = send_json::<Vec<User>>(
            self.client
                .rest(Method::GET, TABLE)
                .query(&[("select", "*".to_string()), ("id", format!("eq.{}", id))]),
        )
        .await;

        Ok(record("select", TABLE, started, result)?.into_iter().next())
    }
}
