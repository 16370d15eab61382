//! Test data and seeding helpers

use chrono::{DateTime, Duration, SubsecRound, Utc};
use uuid::Uuid;

use eventhub::models::{EventDraft, Role};

use super::backend_mock::FakeBackend;

pub const PASSWORD: &str = "secret123";

pub struct TestUser {
    pub name: &'static str,
    pub email: &'static str,
    pub role: Role,
}

pub const ORGANIZER: TestUser = TestUser {
    name: "Grace Organizer",
    email: "grace@example.com",
    role: Role::Organizer,
};

pub const ATTENDEE: TestUser = TestUser {
    name: "Ada Attendee",
    email: "ada@example.com",
    role: Role::User,
};

pub const SECOND_ATTENDEE: TestUser = TestUser {
    name: "Bob Attendee",
    email: "bob@example.com",
    role: Role::User,
};

/// Ids of the seeded accounts
pub struct SeededUsers {
    pub organizer: Uuid,
    pub attendee: Uuid,
    pub second_attendee: Uuid,
}

pub fn seed_users(backend: &FakeBackend) -> SeededUsers {
    let seed = |user: &TestUser| backend.seed_account(user.name, user.email, PASSWORD, user.role);
    SeededUsers {
        organizer: seed(&ORGANIZER),
        attendee: seed(&ATTENDEE),
        second_attendee: seed(&SECOND_ATTENDEE),
    }
}

/// Whole seconds so dates survive the trip through the fake backend unchanged
pub fn days_from_now(days: i64) -> DateTime<Utc> {
    (Utc::now() + Duration::days(days)).trunc_subsecs(0)
}

pub fn draft(title: &str, date: DateTime<Utc>) -> EventDraft {
    EventDraft {
        title: title.to_string(),
        description: format!("{} for everyone", title),
        date,
        location: "Community Center".to_string(),
        image: "https://example.com/poster.jpg".to_string(),
        capacity: 25,
    }
}
