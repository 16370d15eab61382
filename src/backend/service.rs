//! Backend service layer
//!
//! This module bundles the table repositories behind one handle

use super::connection::BackendClient;
use super::repositories::{EventRepository, ProfileRepository, RegistrationRepository};

#[derive(Debug, Clone)]
pub struct BackendService {
    pub profiles: ProfileRepository,
    pub events: EventRepository,
    pub registrations: RegistrationRepository,
}

impl BackendService {
    pub fn new(client: BackendClient) -> Self {
        Self {
            profiles: ProfileRepository::new(client.clone()),
            events: EventRepository::new(client.clone()),
            registrations: RegistrationRepository::new(client),
        }
    }
}
