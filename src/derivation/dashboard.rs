//! Dashboard views
//!
//! Joins registrations to their events for the attendee dashboard and sums up
//! an organizer's events.

use crate::models::{Event, EventStatus, Registration};

/// A registration together with the event it points at
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedEvent {
    pub registration: Registration,
    pub event: Event,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplicationPartition {
    /// Events that are not over yet
    pub active: Vec<AppliedEvent>,
    pub past: Vec<AppliedEvent>,
}

/// Split registrations by whether their event is over; unknown events are dropped
pub fn partition_applications(records: &[Registration], events: &[Event]) -> ApplicationPartition {
    let mut partition = ApplicationPartition::default();

    for registration in records {
        let Some(event) = events.iter().find(|e| e.id == registration.event_id) else {
            continue;
        };

        let applied = AppliedEvent {
            registration: registration.clone(),
            event: event.clone(),
        };

        if event.status == EventStatus::Past {
            partition.past.push(applied);
        } else {
            partition.active.push(applied);
        }
    }

    partition
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OrganizerSummary {
    pub total_events: usize,
    pub upcoming_events: usize,
    pub total_registered: i64,
    pub total_capacity: i64,
}

impl OrganizerSummary {
    pub fn from_events(events: &[Event]) -> Self {
        Self {
            total_events: events.len(),
            upcoming_events: events.iter().filter(|e| e.status == EventStatus::Upcoming).count(),
            total_registered: events.iter().map(|e| i64::from(e.registered_count)).sum(),
            total_capacity: events.iter().map(|e| i64::from(e.capacity)).sum(),
        }
    }

    /// Share of all seats taken, 0.0 when there are no seats
    pub fn utilisation(&self) -> f64 {
        if self.total_capacity == 0 {
            0.0
        } else {
            self.total_registered as f64 / self.total_capacity as f64
        }
    }
}
