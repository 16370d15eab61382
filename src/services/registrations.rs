//! Registration store
//!
//! Cache of the signed-in user's registrations. Refreshed wholesale, never
//! edited in place.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::backend::RegistrationRepository;
use crate::models::{Attendee, Registration};
use crate::services::session::SessionStore;
use crate::utils::errors::Result;
use crate::utils::logging::log_failure;

pub struct RegistrationStore {
    repository: RegistrationRepository,
    session: Arc<SessionStore>,
    records: RwLock<Vec<Registration>>,
}

impl RegistrationStore {
    pub fn new(repository: RegistrationRepository, session: Arc<SessionStore>) -> Self {
        Self {
            repository,
            session,
            records: RwLock::new(Vec::new()),
        }
    }

    /// Reload the current user's registrations; a no-op when nobody is signed in
    pub async fn refresh(&self) -> Result<()> {
        let Some(user) = self.session.current_user() else {
            debug!("Skipping registration refresh, no user");
            return Ok(());
        };

        match self.repository.list_for_user(user.id).await {
            Ok(rows) => {
                let records: Vec<Registration> = rows.into_iter().map(Registration::from).collect();
                debug!(user_id = %user.id, count = records.len(), "Registrations refreshed");
                *self.records.write() = records;
                Ok(())
            }
            Err(e) => {
                log_failure("refresh_registrations", &e);
                Err(e)
            }
        }
    }

    /// Drop everything, used when the user signs out
    pub fn clear(&self) {
        self.records.write().clear();
    }

    pub fn records(&self) -> Vec<Registration> {
        self.records.read().clone()
    }

    pub fn is_registered(&self, event_id: Uuid) -> bool {
        let user = self.session.current_user();
        crate::derivation::is_registered(&self.records.read(), event_id, user.as_ref())
    }

    /// Names of everyone registered for an event
    pub async fn attendees(&self, event_id: Uuid) -> Result<Vec<Attendee>> {
        self.repository.list_attendees(event_id).await.map_err(|e| {
            log_failure("list_attendees", &e);
            e
        })
    }
}
