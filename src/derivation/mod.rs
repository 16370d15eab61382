//! Derivation layer
//!
//! Pure functions over snapshots of the event and registration caches. Nothing
//! here touches the network or mutates state.

pub mod status;
pub mod filters;
pub mod dashboard;

pub use status::{initial_status, is_status_stale};
pub use filters::{
    by_status, can_register, is_registered, organizer_events, search_events, sort_by_date,
    user_registrations, StatusFilter,
};
pub use dashboard::{partition_applications, AppliedEvent, ApplicationPartition, OrganizerSummary};
