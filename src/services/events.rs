//! Event store
//!
//! In-memory list of every event, ordered by date, kept in step with the
//! backend by explicit refreshes. Registration goes through an atomic seat
//! claim on the event row so two people can never take the last seat.

use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::backend::{EventRepository, RegistrationRepository};
use crate::derivation;
use crate::models::{
    Attendee, Event, EventChanges, EventDraft, EventStatus, NewEventRow, NewRegistrationRow,
    Registration, User,
};
use crate::services::registrations::RegistrationStore;
use crate::services::session::SessionStore;
use crate::utils::errors::{EventHubError, Result};
use crate::utils::logging::{log_event_action, log_failure};

pub struct EventStore {
    events_repo: EventRepository,
    registrations_repo: RegistrationRepository,
    session: Arc<SessionStore>,
    registrations: Arc<RegistrationStore>,
    events: RwLock<Vec<Event>>,
    claim_attempts: u32,
}

impl EventStore {
    pub fn new(
        events_repo: EventRepository,
        registrations_repo: RegistrationRepository,
        session: Arc<SessionStore>,
        registrations: Arc<RegistrationStore>,
        claim_attempts: u32,
    ) -> Self {
        Self {
            events_repo,
            registrations_repo,
            session,
            registrations,
            events: RwLock::new(Vec::new()),
            claim_attempts: claim_attempts.max(1),
        }
    }

    /// Replace the cache with the backend's events; on failure the cache is kept
    pub async fn refresh(&self) -> Result<()> {
        match self.events_repo.list().await {
            Ok(mut events) => {
                derivation::sort_by_date(&mut events);
                debug!(count = events.len(), "Events refreshed");
                *self.events.write() = events;
                Ok(())
            }
            Err(e) => {
                log_failure("refresh_events", &e);
                Err(e)
            }
        }
    }

    /// Create an event owned by the signed-in user
    pub async fn create(&self, draft: EventDraft) -> Result<Event> {
        let user = self.require_user("create_event")?;
        if let Err(e) = draft.validate() {
            log_failure("create_event", &e);
            return Err(e);
        }

        let row = NewEventRow {
            status: derivation::initial_status(draft.date, Utc::now()),
            title: draft.title,
            description: draft.description,
            date: draft.date,
            location: draft.location,
            image: draft.image,
            organizer_id: user.id,
            capacity: draft.capacity,
            registered_count: 0,
        };

        let event = self.events_repo.create(&row).await.map_err(|e| {
            log_failure("create_event", &e);
            e
        })?;

        {
            let mut events = self.events.write();
            let position = events.partition_point(|e| e.date <= event.date);
            events.insert(position, event.clone());
        }

        log_event_action(event.id, "create", user.id, Some(&event.status.to_string()));
        Ok(event)
    }

    /// Write every mutable field of an event, then reload the whole list
    pub async fn update(&self, event: &Event) -> Result<()> {
        let changes = EventChanges::from(event);
        if let Err(e) = changes.validate() {
            log_failure("update_event", &e);
            return Err(e);
        }

        self.events_repo.update(event.id, &changes).await.map_err(|e| {
            log_failure("update_event", &e);
            e
        })?;

        if let Some(user) = self.session.current_user() {
            log_event_action(event.id, "update", user.id, None);
        }

        if let Err(e) = self.refresh().await {
            warn!(event_id = %event.id, error = %e, "Event saved but refresh failed");
        }
        Ok(())
    }

    /// Register the signed-in user for an event
    pub async fn register_current_user_for(&self, event_id: Uuid) -> Result<Registration> {
        let result = self.try_register(event_id).await;
        if let Err(ref e) = result {
            log_failure("register_for_event", e);
        }
        result
    }

    async fn try_register(&self, event_id: Uuid) -> Result<Registration> {
        let user = self.session.current_user().ok_or(EventHubError::NotAuthenticated)?;
        let event = self.get(event_id).ok_or(EventHubError::EventNotFound { event_id })?;

        if event.is_full() {
            return Err(EventHubError::EventAtCapacity {
                event_id,
                capacity: event.capacity,
            });
        }
        if self.registrations.is_registered(event_id) {
            return Err(EventHubError::AlreadyRegistered { event_id });
        }

        let claimed = self.claim_seat(&event).await?;

        let row = NewRegistrationRow {
            event_id,
            user_id: user.id,
        };
        let registration = match self.registrations_repo.create(&row).await {
            Ok(row) => Registration::from(row),
            Err(e) => {
                self.release_seat(&claimed).await;
                return Err(match e {
                    EventHubError::Backend(ref backend) if backend.is_unique_violation() => {
                        EventHubError::AlreadyRegistered { event_id }
                    }
                    other => other,
                });
            }
        };

        log_event_action(event_id, "register", user.id, None);

        let (events, registrations) = futures::join!(self.refresh(), self.registrations.refresh());
        if let Err(e) = events {
            warn!(event_id = %event_id, error = %e, "Registered but event refresh failed");
        }
        if let Err(e) = registrations {
            warn!(event_id = %event_id, error = %e, "Registered but registration refresh failed");
        }

        Ok(registration)
    }

    /// Compare-and-set the seat counter, re-reading the event after each lost race
    async fn claim_seat(&self, event: &Event) -> Result<Event> {
        let mut current = event.clone();

        for attempt in 1..=self.claim_attempts {
            if current.is_full() {
                return Err(EventHubError::EventAtCapacity {
                    event_id: current.id,
                    capacity: current.capacity,
                });
            }

            if let Some(updated) = self
                .events_repo
                .claim_seat(current.id, current.registered_count)
                .await?
            {
                debug!(event_id = %updated.id, registered = updated.registered_count, "Seat claimed");
                return Ok(updated);
            }

            debug!(event_id = %current.id, attempt = attempt, "Seat claim lost, re-reading event");
            current = self
                .events_repo
                .find_by_id(current.id)
                .await?
                .ok_or(EventHubError::EventNotFound { event_id: current.id })?;
        }

        if current.is_full() {
            return Err(EventHubError::EventAtCapacity {
                event_id: current.id,
                capacity: current.capacity,
            });
        }

        Err(EventHubError::RegistrationConflict {
            event_id: current.id,
            attempts: self.claim_attempts,
        })
    }

    /// Best effort: a seat whose registration insert failed goes back to the pool
    async fn release_seat(&self, claimed: &Event) {
        match self
            .events_repo
            .release_seat(claimed.id, claimed.registered_count)
            .await
        {
            Ok(true) => info!(event_id = %claimed.id, "Released unused seat"),
            Ok(false) => warn!(event_id = %claimed.id, "Seat count moved on, unused seat not released"),
            Err(e) => warn!(event_id = %claimed.id, error = %e, "Failed to release unused seat"),
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.read().clone()
    }

    pub fn get(&self, event_id: Uuid) -> Option<Event> {
        self.events.read().iter().find(|e| e.id == event_id).cloned()
    }

    pub fn by_status(&self, status: EventStatus) -> Vec<Event> {
        derivation::by_status(&self.events.read(), status)
    }

    /// Events owned by the signed-in organizer
    pub fn organizer_events(&self) -> Vec<Event> {
        let user = self.session.current_user();
        derivation::organizer_events(&self.events.read(), user.as_ref())
    }

    /// The signed-in user's registrations
    pub fn user_registrations(&self) -> Vec<Registration> {
        let user = self.session.current_user();
        derivation::user_registrations(&self.registrations.records(), user.as_ref())
    }

    pub async fn attendees(&self, event_id: Uuid) -> Result<Vec<Attendee>> {
        self.registrations.attendees(event_id).await
    }

    fn require_user(&self, operation: &str) -> Result<User> {
        self.session.current_user().ok_or_else(|| {
            let err = EventHubError::NotAuthenticated;
            log_failure(operation, &err);
            err
        })
    }
}
