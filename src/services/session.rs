//! Session store
//!
//! Tracks who is signed in and with which role. The identity comes from the
//! auth provider's session plus the linked `profiles` row, and is kept in step
//! with the provider through a single long-lived listener.

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::backend::{AuthClient, ProfileRepository};
use crate::models::{AuthChange, AuthUser, Role, User};
use crate::utils::errors::{EventHubError, Result, ValidationErrors};
use crate::utils::helpers::is_valid_email;
use crate::utils::logging::{log_failure, log_user_action};

const MIN_PASSWORD_LENGTH: usize = 6;

/// Snapshot of the authentication state
#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub user: Option<User>,
    pub is_authenticated: bool,
    pub is_loading: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            user: None,
            is_authenticated: false,
            is_loading: true,
        }
    }
}

pub struct SessionStore {
    auth: AuthClient,
    profiles: ProfileRepository,
    state: RwLock<AuthState>,
    identity: watch::Sender<Option<User>>,
}

impl SessionStore {
    pub fn new(auth: AuthClient, profiles: ProfileRepository) -> Self {
        let (identity, _) = watch::channel(None);
        Self {
            auth,
            profiles,
            state: RwLock::new(AuthState::default()),
            identity,
        }
    }

    /// Resolve an existing provider session into an identity
    pub async fn initialize(&self) -> Result<()> {
        match self.auth.get_session().await {
            Ok(Some(session)) => {
                debug!(user_id = %session.user.id, "Found existing session");
                self.resolve_profile(session.user.id).await;
            }
            Ok(None) => {
                debug!("No existing session");
                self.set_user(None);
            }
            Err(e) => {
                log_failure("get_session", &e);
                self.set_user(None);
                return Err(e);
            }
        }
        Ok(())
    }

    /// Follow provider sign-ins and sign-outs until the channel closes
    pub fn spawn_listener(self: &Arc<Self>) -> JoinHandle<()> {
        let store = Arc::clone(self);
        let mut changes = self.auth.subscribe();

        tokio::spawn(async move {
            loop {
                match changes.recv().await {
                    Ok(AuthChange::SignedIn(session)) => {
                        store.resolve_profile(session.user.id).await;
                    }
                    Ok(AuthChange::SignedOut) => {
                        store.set_user(None);
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped = skipped, "Session listener lagged, re-reading session");
                        match store.auth.current_session() {
                            Some(session) => store.resolve_profile(session.user.id).await,
                            None => store.set_user(None),
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            debug!("Session listener stopped");
        })
    }

    /// Sign in and check the account has the role the caller picked
    pub async fn login(&self, email: &str, password: &str, expected_role: Role) -> Result<User> {
        let result = self.try_login(email, password, expected_role).await;
        if let Err(ref e) = result {
            log_failure("login", e);
        }
        result
    }

    async fn try_login(&self, email: &str, password: &str, expected_role: Role) -> Result<User> {
        let session = self.auth.sign_in_with_password(email, password).await?;

        let profile = match self.profiles.find_by_id(session.user.id).await {
            Ok(profile) => profile,
            Err(e) => {
                self.abandon_session().await;
                return Err(e);
            }
        };

        match profile {
            Some(user) if user.role == expected_role => {
                self.set_user(Some(user.clone()));
                log_user_action(user.id, "login", Some(&user.role.to_string()));
                Ok(user)
            }
            other => {
                self.abandon_session().await;
                Err(EventHubError::RoleMismatch {
                    expected: expected_role,
                    actual: other.map(|u| u.role),
                })
            }
        }
    }

    /// Create an account; name and role travel as profile metadata
    pub async fn register(&self, name: &str, email: &str, password: &str, role: Role) -> Result<AuthUser> {
        let mut errors = ValidationErrors::new();
        if name.trim().is_empty() {
            errors.add("name", "Name is required");
        }
        if !is_valid_email(email) {
            errors.add("email", "Email address is invalid");
        }
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            errors.add("password", format!("Password must be at least {} characters", MIN_PASSWORD_LENGTH));
        }
        errors.into_result()?;

        match self.auth.sign_up(email.trim(), password, name.trim(), role).await {
            Ok(user) => {
                log_user_action(user.id, "register", Some(&role.to_string()));
                Ok(user)
            }
            Err(e) => {
                log_failure("register", &e);
                Err(e)
            }
        }
    }

    /// End the provider session; on failure the identity is kept
    pub async fn logout(&self) -> Result<()> {
        let user_id = self.current_user().map(|u| u.id);

        if let Err(e) = self.auth.sign_out().await {
            log_failure("logout", &e);
            return Err(e);
        }

        self.set_user(None);
        if let Some(user_id) = user_id {
            log_user_action(user_id, "logout", None);
        }
        Ok(())
    }

    pub fn current_user(&self) -> Option<User> {
        self.state.read().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read().is_authenticated
    }

    pub fn is_loading(&self) -> bool {
        self.state.read().is_loading
    }

    pub fn snapshot(&self) -> AuthState {
        self.state.read().clone()
    }

    /// Notified whenever the signed-in user changes
    pub fn watch_identity(&self) -> watch::Receiver<Option<User>> {
        self.identity.subscribe()
    }

    async fn resolve_profile(&self, user_id: Uuid) {
        match self.profiles.find_by_id(user_id).await {
            Ok(Some(user)) => {
                debug!(user_id = %user.id, role = %user.role, "Profile resolved");
                self.set_user(Some(user));
            }
            Ok(None) => {
                warn!(user_id = %user_id, "Session has no profile row");
                self.set_user(None);
            }
            Err(e) => {
                error!(user_id = %user_id, error = %e, "Error fetching user profile");
                self.set_user(None);
            }
        }
    }

    /// Sign out after a failed login; the original error is what the caller sees
    async fn abandon_session(&self) {
        if let Err(e) = self.auth.sign_out().await {
            warn!(error = %e, "Failed to sign out after rejected login");
        }
        self.set_user(None);
    }

    fn set_user(&self, user: Option<User>) {
        {
            let mut state = self.state.write();
            state.is_authenticated = user.is_some();
            state.is_loading = false;
            state.user = user.clone();
        }

        self.identity.send_if_modified(|current| {
            let changed = current.as_ref().map(|u| u.id) != user.as_ref().map(|u| u.id);
            *current = user;
            if changed {
                info!(user_id = ?current.as_ref().map(|u| u.id), "Signed-in user changed");
            }
            changed
        });
    }
}
