//! Auth provider client
//!
//! Password sign-in, sign-up and sign-out against the hosted auth API. The
//! current session lives in memory and, when a session file is configured, on
//! disk so the next process can pick it up. Every sign-in and sign-out is
//! announced on a broadcast channel.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;
use reqwest::Method;
use serde_json::json;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use super::connection::{send, send_json, BackendClient};
use crate::models::{AuthChange, AuthUser, Role, Session, SignUpResponse, TokenResponse};
use crate::utils::errors::{BackendError, EventHubError, Result};

const CHANGE_CHANNEL_CAPACITY: usize = 16;

#[derive(Debug, Clone)]
pub struct AuthClient {
    client: BackendClient,
    session: Arc<RwLock<Option<Session>>>,
    session_file: Option<PathBuf>,
    changes: broadcast::Sender<AuthChange>,
}

impl AuthClient {
    pub fn new(client: BackendClient, session_file: Option<PathBuf>) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            client,
            session: Arc::new(RwLock::new(None)),
            session_file,
            changes,
        }
    }

    /// Receive every future sign-in and sign-out
    pub fn subscribe(&self) -> broadcast::Receiver<AuthChange> {
        self.changes.subscribe()
    }

    /// Session held in memory, without touching disk
    pub fn current_session(&self) -> Option<Session> {
        self.session.read().clone()
    }

    /// Existing session from memory or the session file; expired ones are dropped
    pub async fn get_session(&self) -> Result<Option<Session>> {
        if let Some(session) = self.current_session() {
            if !session.is_expired() {
                return Ok(Some(session));
            }
            info!(user_id = %session.user.id, "In-memory session expired");
            self.forget_session().await?;
            return Ok(None);
        }

        let Some(path) = &self.session_file else {
            return Ok(None);
        };

        let data = match tokio::fs::read_to_string(path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let session: Session = match serde_json::from_str(&data) {
            Ok(session) => session,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Discarding unreadable session file");
                self.forget_session().await?;
                return Ok(None);
            }
        };

        if session.is_expired() {
            info!(user_id = %session.user.id, "Stored session expired");
            self.forget_session().await?;
            return Ok(None);
        }

        debug!(user_id = %session.user.id, "Restored session from disk");
        self.store(session.clone());
        Ok(Some(session))
    }

    /// Password grant
    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session> {
        debug!(email = email, "Signing in with password");

        let token: TokenResponse = send_json(
            self.client
                .auth(Method::POST, "token")
                .query(&[("grant_type", "password")])
                .json(&json!({ "email": email, "password": password })),
        )
        .await
        .map_err(provider_rejection)?;

        let session = Session::from(token);
        self.start_session(session.clone()).await?;
        Ok(session)
    }

    /// Create an account carrying `name` and `role` as profile metadata
    pub async fn sign_up(&self, email: &str, password: &str, name: &str, role: Role) -> Result<AuthUser> {
        debug!(email = email, role = %role, "Signing up");

        let response: SignUpResponse = send_json(
            self.client.auth(Method::POST, "signup").json(&json!({
                "email": email,
                "password": password,
                "data": { "name": name, "role": role },
            })),
        )
        .await
        .map_err(|e| match e {
            BackendError::InvalidResponse(_) => {
                EventHubError::Authentication("User registration failed".to_string())
            }
            other => provider_rejection(other),
        })?;

        let user = response.user().clone();

        // auto-confirming providers sign the new account in right away
        if let SignUpResponse::Session(token) = response {
            self.start_session(Session::from(token)).await?;
        }

        Ok(user)
    }

    /// End the provider session; local state is only cleared when the provider agrees
    pub async fn sign_out(&self) -> Result<()> {
        if self.client.has_access_token() {
            send(self.client.auth(Method::POST, "logout"))
                .await
                .map_err(provider_rejection)?;
        }

        self.forget_session().await?;
        let _ = self.changes.send(AuthChange::SignedOut);
        Ok(())
    }

    async fn start_session(&self, session: Session) -> Result<()> {
        self.store(session.clone());
        self.persist(&session).await?;
        info!(user_id = %session.user.id, "Session started");
        let _ = self.changes.send(AuthChange::SignedIn(session));
        Ok(())
    }

    fn store(&self, session: Session) {
        self.client.set_access_token(Some(session.access_token.clone()));
        *self.session.write() = Some(session);
    }

    async fn persist(&self, session: &Session) -> Result<()> {
        let Some(path) = &self.session_file else {
            return Ok(());
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, serde_json::to_vec(session)?).await?;
        Ok(())
    }

    async fn forget_session(&self) -> Result<()> {
        self.client.set_access_token(None);
        *self.session.write() = None;

        if let Some(path) = &self.session_file {
            match tokio::fs::remove_file(path).await {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}

/// Client errors from the auth API are the provider saying no
fn provider_rejection(err: BackendError) -> EventHubError {
    match err {
        BackendError::Api { status, message, .. } if (400..500).contains(&status) => {
            EventHubError::Authentication(message)
        }
        other => other.into(),
    }
}
