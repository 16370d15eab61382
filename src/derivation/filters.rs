//! Filters over cached events and registrations

use uuid::Uuid;

use crate::models::{Event, EventStatus, Registration, User};

/// Tab selection on the event listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(EventStatus),
}

pub fn by_status(events: &[Event], status: EventStatus) -> Vec<Event> {
    events.iter().filter(|e| e.status == status).cloned().collect()
}

/// Events owned by `user`; empty unless the user is an organizer
pub fn organizer_events(events: &[Event], user: Option<&User>) -> Vec<Event> {
    match user {
        Some(user) if user.is_organizer() => events
            .iter()
            .filter(|e| e.organizer_id == user.id)
            .cloned()
            .collect(),
        _ => Vec::new(),
    }
}

/// Registrations belonging to `user`; empty when nobody is signed in
pub fn user_registrations(records: &[Registration], user: Option<&User>) -> Vec<Registration> {
    match user {
        Some(user) => records
            .iter()
            .filter(|r| r.user_id == user.id)
            .cloned()
            .collect(),
        None => Vec::new(),
    }
}

/// Status tab plus case-insensitive title search; a blank query matches everything
pub fn search_events(events: &[Event], filter: StatusFilter, query: &str) -> Vec<Event> {
    let query = query.trim().to_lowercase();

    events
        .iter()
        .filter(|e| match filter {
            StatusFilter::All => true,
            StatusFilter::Only(status) => e.status == status,
        })
        .filter(|e| query.is_empty() || e.title.to_lowercase().contains(&query))
        .cloned()
        .collect()
}

/// Order events by start date; events on the same date keep their order
pub fn sort_by_date(events: &mut [Event]) {
    events.sort_by_key(|e| e.date);
}

/// Open for registration: not over and seats remain
pub fn can_register(event: &Event) -> bool {
    event.status != EventStatus::Past && !event.is_full()
}

pub fn is_registered(records: &[Registration], event_id: Uuid, user: Option<&User>) -> bool {
    match user {
        Some(user) => records
            .iter()
            .any(|r| r.event_id == event_id && r.user_id == user.id),
        None => false,
    }
}
