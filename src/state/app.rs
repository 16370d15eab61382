//! Application state
//!
//! One object owns the backend handles and the three stores. It is built once,
//! started once, passed by reference to whatever renders data, and shut down at
//! exit. Signing out clears the user's registrations through the identity
//! listener.

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::backend::{AuthClient, BackendClient, BackendService};
use crate::config::Settings;
use crate::services::{EventStore, RegistrationStore, SessionStore};
use crate::utils::errors::Result;
use crate::utils::logging::log_api_error;

pub struct AppState {
    pub settings: Settings,
    pub backend: BackendService,
    pub session: Arc<SessionStore>,
    pub events: Arc<EventStore>,
    pub registrations: Arc<RegistrationStore>,
    client: BackendClient,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl AppState {
    /// Wire up the client and stores; nothing is fetched yet
    pub fn new(settings: Settings) -> Result<Self> {
        let client = BackendClient::new(&settings.backend)?;
        let backend = BackendService::new(client.clone());
        let auth = AuthClient::new(
            client.clone(),
            settings.backend.session_file.as_ref().map(PathBuf::from),
        );

        let session = Arc::new(SessionStore::new(auth, backend.profiles.clone()));
        let registrations = Arc::new(RegistrationStore::new(
            backend.registrations.clone(),
            Arc::clone(&session),
        ));
        let events = Arc::new(EventStore::new(
            backend.events.clone(),
            backend.registrations.clone(),
            Arc::clone(&session),
            Arc::clone(&registrations),
            settings.events.claim_attempts,
        ));

        Ok(Self {
            settings,
            backend,
            session,
            events,
            registrations,
            client,
            tasks: Mutex::new(Vec::new()),
        })
    }

    /// Resolve identity, load events and registrations, start listening for changes
    ///
    /// Fetch failures are logged and leave the caches empty; only a broken
    /// session store aborts startup.
    pub async fn start(&self) -> Result<()> {
        info!("Starting application state");

        if let Err(e) = self.session.initialize().await {
            warn!(error = %e, "Could not restore session, continuing signed out");
        }

        let _ = self.events.refresh().await;
        let _ = self.registrations.refresh().await;

        let session_listener = self.session.spawn_listener();
        let identity_listener = self.spawn_identity_listener();
        self.tasks.lock().extend([session_listener, identity_listener]);

        info!(
            events = self.events.events().len(),
            authenticated = self.session.is_authenticated(),
            "Application state ready"
        );
        Ok(())
    }

    /// Stop background listeners
    pub fn shutdown(&self) {
        for task in self.tasks.lock().drain(..) {
            task.abort();
        }
        debug!("Application state shut down");
    }

    pub async fn backend_healthy(&self) -> bool {
        match self.client.health_check().await {
            Ok(healthy) => healthy,
            Err(e) => {
                log_api_error("health", &e.to_string(), Some(self.client.base_url()));
                false
            }
        }
    }

    fn spawn_identity_listener(&self) -> JoinHandle<()> {
        let mut identity = self.session.watch_identity();
        let events = Arc::clone(&self.events);
        let registrations = Arc::clone(&self.registrations);

        tokio::spawn(async move {
            while identity.changed().await.is_ok() {
                let signed_in = identity.borrow_and_update().is_some();
                if signed_in {
                    let _ = futures::join!(events.refresh(), registrations.refresh());
                } else {
                    registrations.clear();
                }
            }
        })
    }
}

impl Drop for AppState {
    fn drop(&mut self) {
        self.shutdown();
    }
}
