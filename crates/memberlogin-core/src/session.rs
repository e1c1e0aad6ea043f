//! Application-wide session state.
//!
//! `SessionContext` is constructed once at startup and handed to whoever
//! needs it. `login` and `logout` are the only writers; any number of
//! readers can take snapshots or subscribe to changes.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::auth::AuthToken;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<AuthToken>,
    pub authenticated: bool,
    pub authenticated_at: Option<DateTime<Utc>>,
}

/// Shared handle to the current session.
/// Clone is cheap - all clones observe and update the same state.
#[derive(Clone)]
pub struct SessionContext {
    tx: Arc<watch::Sender<Session>>,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionContext {
    /// Create an unauthenticated session
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Session::default());
        Self { tx: Arc::new(tx) }
    }

    /// Store the token and mark the session authenticated
    pub fn login(&self, token: AuthToken) {
        self.tx.send_modify(|session| {
            session.token = Some(token);
            session.authenticated = true;
            session.authenticated_at = Some(Utc::now());
        });
        info!("Session authenticated");
    }

    /// Clear the token and authentication flag
    pub fn logout(&self) {
        let was_authenticated = self.tx.send_if_modified(|session| {
            if *session == Session::default() {
                return false;
            }
            *session = Session::default();
            true
        });
        debug!(was_authenticated, "Session cleared");
    }

    pub fn snapshot(&self) -> Session {
        self.tx.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.tx.borrow().authenticated
    }

    pub fn token(&self) -> Option<AuthToken> {
        self.tx.borrow().token.clone()
    }

    /// Watch for login/logout from elsewhere in the application
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.tx.subscribe()
    }
}
