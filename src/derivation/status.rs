//! Event status classification
//!
//! Status is decided once, when an event is created, and stored. It is not
//! advanced as time passes.

use chrono::{DateTime, Utc};

use crate::models::{Event, EventStatus};

/// Status given to a new event: `Upcoming` if it starts strictly after `now`,
/// otherwise `Present`. `Past` is never assigned here.
pub fn initial_status(date: DateTime<Utc>, now: DateTime<Utc>) -> EventStatus {
    if date > now {
        EventStatus::Upcoming
    } else {
        EventStatus::Present
    }
}

/// An event still stored as upcoming although its date has passed
pub fn is_status_stale(event: &Event, now: DateTime<Utc>) -> bool {
    event.status == EventStatus::Upcoming && event.date <= now
}
