//! Session state derived from the token store
//!
//! [`Session`] owns the tri-state status (`loading`, `authenticated`,
//! `unauthenticated`) and is the only component that changes it. Every
//! transition bumps a generation counter under the same lock that writes the
//! token store, so a validation call that resolves after a newer transition
//! (a second startup, a login, a logout) is discarded instead of overwriting
//! fresher state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;

use crate::client::AuthApi;
use crate::client::models::UserProfile;
use crate::config::SessionSettings;
use crate::error::StoreError;
use crate::store::{Token, TokenStore};

pub mod expiry;

/// Whether the current user may see protected screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Unauthenticated,
    Loading,
    Authenticated,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            SessionStatus::Unauthenticated => "unauthenticated",
            SessionStatus::Loading => "loading",
            SessionStatus::Authenticated => "authenticated",
        };
        f.write_str(label)
    }
}

/// Snapshot of the session. `user` is present exactly when authenticated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionState {
    pub status: SessionStatus,
    pub user: Option<UserProfile>,
}

impl SessionState {
    pub fn loading() -> Self {
        Self {
            status: SessionStatus::Loading,
            user: None,
        }
    }

    pub fn unauthenticated() -> Self {
        Self {
            status: SessionStatus::Unauthenticated,
            user: None,
        }
    }

    pub fn authenticated(user: UserProfile) -> Self {
        Self {
            status: SessionStatus::Authenticated,
            user: Some(user),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == SessionStatus::Loading
    }

    pub fn is_authenticated(&self) -> bool {
        self.status == SessionStatus::Authenticated
    }
}

/// Tunables for session validation
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Bound on the startup `current_user` call; expiry counts as a failed validation
    pub validation_timeout: Duration,
    /// Drop JWTs whose `exp` claim has passed without asking the server
    pub check_token_expiry: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::from(&SessionSettings::default())
    }
}

impl From<&SessionSettings> for SessionOptions {
    fn from(settings: &SessionSettings) -> Self {
        Self {
            validation_timeout: settings.validation_timeout(),
            check_token_expiry: settings.check_token_expiry,
        }
    }
}

/// Clears the in-flight flag when a validation attempt ends, however it ends
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Session state machine over a token store and the backend's profile endpoint
pub struct Session {
    api: Arc<dyn AuthApi>,
    store: Arc<dyn TokenStore>,
    options: SessionOptions,
    state: watch::Sender<SessionState>,
    /// Tag of the latest transition; guards the token store as well
    generation: Mutex<u64>,
    validating: AtomicBool,
}

impl Session {
    /// Create a session in the `loading` state. Call [`initialize`](Self::initialize)
    /// to resolve it.
    pub fn new(api: Arc<dyn AuthApi>, store: Arc<dyn TokenStore>, options: SessionOptions) -> Self {
        let (state, _) = watch::channel(SessionState::loading());
        Self {
            api,
            store,
            options,
            state,
            generation: Mutex::new(0),
            validating: AtomicBool::new(false),
        }
    }

    /// Current state. Never blocks.
    pub fn get(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Receiver that observes every published state
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Wait until the session has left `loading`
    pub async fn resolved(&self) -> SessionState {
        let mut rx = self.subscribe();
        let resolved = rx
            .wait_for(|state| !state.is_loading())
            .await
            .map(|state| state.clone());
        resolved.unwrap_or_else(|_| self.get())
    }

    /// Expiry of the stored token, when it is a JWT carrying an `exp` claim
    pub fn token_expiry(&self) -> Option<DateTime<Utc>> {
        self.store.get().and_then(|token| expiry::token_expiry(&token))
    }

    /// Re-derive the session from the token store.
    ///
    /// Publishes `loading`, then `unauthenticated` when no token is stored, or
    /// the outcome of validating the token against the backend. Any validation
    /// failure, timeout included, clears the stored token. A call made while
    /// another validation is in flight returns immediately; use
    /// [`resolved`](Self::resolved) to wait for the outcome. Dropping the
    /// future mid-validation leaves the session `loading` until the next call.
    pub async fn initialize(&self) {
        if self.validating.swap(true, Ordering::AcqRel) {
            log::debug!("Session validation already in flight, ignoring initialize()");
            return;
        }
        let _in_flight = InFlight(&self.validating);

        let attempt = self.begin();

        let Some(token) = self.store.get() else {
            log::debug!("No stored token, session is unauthenticated");
            self.settle(attempt, SessionState::unauthenticated(), false);
            return;
        };

        if self.options.check_token_expiry && expiry::is_expired(&token, Utc::now()) {
            log::info!("Stored token has expired, signing out without contacting the server");
            self.settle(attempt, SessionState::unauthenticated(), true);
            return;
        }

        let timeout = self.options.validation_timeout;
        match tokio::time::timeout(timeout, self.api.current_user(&token)).await {
            Ok(Ok(user)) => {
                log::debug!("Session validated for {}", user.email);
                self.settle(attempt, SessionState::authenticated(user), false);
            }
            Ok(Err(err)) => {
                if err.is_auth_rejection() {
                    log::info!("Stored token was rejected by the server");
                } else {
                    log::warn!("Session validation failed: {}", err);
                }
                self.settle(attempt, SessionState::unauthenticated(), true);
            }
            Err(_) => {
                log::warn!("Session validation timed out after {:?}", timeout);
                self.settle(attempt, SessionState::unauthenticated(), true);
            }
        }
    }

    /// Persist `token` and publish `authenticated` with `user`.
    ///
    /// Supersedes any validation in flight. On a store failure nothing changes.
    pub fn sign_in(&self, token: &Token, user: UserProfile) -> Result<(), StoreError> {
        let mut generation = self.lock_generation();
        self.store.set(token)?;
        *generation += 1;
        self.state.send_replace(SessionState::authenticated(user));
        Ok(())
    }

    /// Clear the token and publish `unauthenticated`. Purely local.
    pub fn sign_out(&self) {
        let mut generation = self.lock_generation();
        *generation += 1;
        self.store.clear();
        self.state.send_replace(SessionState::unauthenticated());
    }

    fn lock_generation(&self) -> MutexGuard<'_, u64> {
        self.generation
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a validation attempt: publish `loading` and return the attempt's tag
    fn begin(&self) -> u64 {
        let mut generation = self.lock_generation();
        *generation += 1;
        self.state.send_replace(SessionState::loading());
        *generation
    }

    /// Apply an attempt's outcome unless a newer transition happened meanwhile
    fn settle(&self, attempt: u64, state: SessionState, clear_token: bool) {
        let generation = self.lock_generation();
        if *generation != attempt {
            log::debug!(
                "Discarding stale validation result (attempt {}, latest {})",
                attempt,
                *generation
            );
            return;
        }

        if clear_token {
            self.store.clear();
        }
        self.state.send_replace(state);
    }
}
