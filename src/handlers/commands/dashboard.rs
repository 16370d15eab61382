//! Dashboard command handler

use std::fmt::Write;

use crate::derivation::{partition_applications, OrganizerSummary};
use crate::models::Role;
use crate::state::AppState;
use crate::utils::helpers::{format_event_date, format_timestamp};

/// Attendees see their registrations, organizers their events
pub fn dashboard(app: &AppState) -> String {
    let Some(user) = app.session.current_user() else {
        return "Log in to see your dashboard".to_string();
    };

    match user.role {
        Role::User => user_dashboard(app),
        Role::Organizer => organizer_dashboard(app),
    }
}

fn user_dashboard(app: &AppState) -> String {
    let partition = partition_applications(&app.events.user_registrations(), &app.events.events());
    let mut out = String::new();

    let _ = writeln!(out, "Upcoming & current ({})", partition.active.len());
    for applied in &partition.active {
        let _ = writeln!(
            out,
            "  {} | {} | {} (applied {})",
            applied.event.title,
            format_event_date(applied.event.date),
            applied.registration.status,
            format_timestamp(applied.registration.applied_at)
        );
    }

    let _ = writeln!(out, "Past ({})", partition.past.len());
    for applied in &partition.past {
        let _ = writeln!(out, "  {} | {}", applied.event.title, format_event_date(applied.event.date));
    }

    out.trim_end().to_string()
}

fn organizer_dashboard(app: &AppState) -> String {
    let events = app.events.organizer_events();
    let summary = OrganizerSummary::from_events(&events);
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Events: {} ({} upcoming) | Registrations: {} | Seats filled: {:.0}%",
        summary.total_events,
        summary.upcoming_events,
        summary.total_registered,
        summary.utilisation() * 100.0
    );
    for event in &events {
        let _ = writeln!(
            out,
            "  [{}] {} | {} | {}/{}",
            event.status.label(),
            event.title,
            format_event_date(event.date),
            event.registered_count,
            event.capacity
        );
    }

    out.trim_end().to_string()
}
