//! Test context for unified test setup
//!
//! Starts a fake backend, points settings at it and builds application state
//! instances that each get their own session file unless told otherwise.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tempfile::TempDir;

use eventhub::config::{BackendConfig, EventsConfig, LoggingConfig, Settings};
use eventhub::models::Role;
use eventhub::AppState;

use super::backend_mock::FakeBackend;
use super::test_data::{ORGANIZER, PASSWORD};

pub struct TestContext {
    pub backend: FakeBackend,
    pub temp_dir: TempDir,
    next_session: AtomicUsize,
}

impl TestContext {
    pub async fn new() -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("eventhub=debug")
            .with_test_writer()
            .try_init();

        Self {
            backend: FakeBackend::start().await,
            temp_dir: tempfile::tempdir().expect("Failed to create temp dir"),
            next_session: AtomicUsize::new(0),
        }
    }

    /// Settings for the fake backend using the given session file
    pub fn settings_with_session(&self, session_file: PathBuf) -> Settings {
        Settings {
            backend: BackendConfig {
                url: self.backend.uri(),
                anon_key: "test-anon-key".to_string(),
                timeout_seconds: 5,
                session_file: Some(session_file.to_string_lossy().into_owned()),
            },
            events: EventsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    pub fn settings(&self) -> Settings {
        self.settings_with_session(self.fresh_session_file())
    }

    pub fn fresh_session_file(&self) -> PathBuf {
        let n = self.next_session.fetch_add(1, Ordering::SeqCst);
        self.temp_dir.path().join(format!("session-{}.json", n))
    }

    /// Application state that has not been started
    pub fn app(&self) -> AppState {
        AppState::new(self.settings()).expect("Failed to build app state")
    }

    /// Started application state, signed out
    pub async fn started_app(&self) -> AppState {
        let app = self.app();
        app.start().await.expect("Failed to start app state");
        app
    }

    /// Started application state signed in with the seeded password
    pub async fn signed_in_app(&self, email: &str, role: Role) -> AppState {
        let app = self.started_app().await;
        app.session
            .login(email, PASSWORD, role)
            .await
            .expect("Failed to sign in");
        app.registrations
            .refresh()
            .await
            .expect("Failed to load registrations");
        app
    }

    pub async fn organizer_app(&self) -> AppState {
        self.signed_in_app(ORGANIZER.email, Role::Organizer).await
    }
}

/// Poll until `condition` holds or two seconds pass
pub async fn wait_until<F>(mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    for _ in 0..200 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}
