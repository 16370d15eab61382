//! Event command handlers

use std::fmt::Write;

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use super::CreateArgs;
use crate::derivation::{self, StatusFilter};
use crate::models::{Event, EventDraft};
use crate::state::AppState;
use crate::utils::errors::{EventHubError, Result};
use crate::utils::helpers::{format_event_date, format_event_time, format_timestamp, truncate_text};

/// One line per event matching the tab and search query
pub fn list_events(app: &AppState, filter: StatusFilter, query: &str) -> String {
    let events = derivation::search_events(&app.events.events(), filter, query);

    if events.is_empty() {
        return "No events found".to_string();
    }

    events
        .iter()
        .map(event_line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn event_line(event: &Event) -> String {
    format!(
        "[{}] {} | {} | {} | {}/{} registered | {}",
        event.status.label(),
        event.title,
        format_event_date(event.date),
        event.location,
        event.registered_count,
        event.capacity,
        event.id
    )
}

/// Full event page: details, seats, attendees and the viewer's registration state
pub async fn show_event(app: &AppState, event_id: Uuid) -> Result<String> {
    debug!(event_id = %event_id, "Showing event");

    let Some(event) = app.events.get(event_id) else {
        return Ok("Event Not Found: the event you're looking for doesn't exist or has been removed.".to_string());
    };

    let mut out = String::new();
    let _ = writeln!(out, "{} [{}]", event.title, event.status.label());
    let _ = writeln!(out, "{} at {}", format_event_date(event.date), format_event_time(event.date));
    let _ = writeln!(out, "Location: {}", event.location);
    if derivation::is_status_stale(&event, Utc::now()) {
        let _ = writeln!(out, "Started {}, status not yet updated", format_timestamp(event.date));
    }
    let _ = writeln!(out, "{}", truncate_text(&event.description, 280));
    let _ = writeln!(
        out,
        "Seats: {} of {} taken, {} left",
        event.registered_count,
        event.capacity,
        event.seats_left()
    );

    let attendees = app.events.attendees(event_id).await?;
    if !attendees.is_empty() {
        let names: Vec<&str> = attendees.iter().map(|a| a.name.as_str()).collect();
        let _ = writeln!(out, "Attendees: {}", names.join(", "));
    }

    let user = app.session.current_user();
    let registered = derivation::is_registered(&app.registrations.records(), event_id, user.as_ref());
    let state = if registered {
        "You are registered for this event"
    } else if !derivation::can_register(&event) {
        if event.is_full() {
            "This event is full"
        } else {
            "Registration is closed"
        }
    } else if user.is_none() {
        "Log in to register"
    } else {
        "Registration open"
    };
    out.push_str(state);

    Ok(out)
}

pub async fn register(app: &AppState, event_id: Uuid) -> Result<String> {
    let registration = app.events.register_current_user_for(event_id).await?;
    let title = app
        .events
        .get(event_id)
        .map(|e| e.title)
        .unwrap_or_else(|| event_id.to_string());

    Ok(format!(
        "Registered for {}. {}",
        title,
        registration.status.message()
    ))
}

/// Organizer-only form: attendees are turned away before anything is sent
pub async fn create(app: &AppState, args: CreateArgs) -> Result<String> {
    let user = app.session.current_user().ok_or(EventHubError::NotAuthenticated)?;
    if !user.is_organizer() {
        return Err(EventHubError::PermissionDenied(
            "Only organizers can create events".to_string(),
        ));
    }

    let draft = EventDraft {
        title: args.title,
        description: args.description,
        date: args.date,
        location: args.location,
        image: args
            .image
            .unwrap_or_else(|| app.settings.events.default_image.clone()),
        capacity: args
            .capacity
            .unwrap_or(app.settings.events.default_capacity),
    };

    let event = app.events.create(draft).await?;
    Ok(format!("Created event {} ({})\n{}", event.title, event.status.label(), event.id))
}
