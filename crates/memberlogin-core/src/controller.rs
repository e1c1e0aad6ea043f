//! Login form state machine.
//!
//! `LoginController` owns the transient form state (field values, the
//! password visibility toggle, per-field errors) and drives one login:
//!
//! ```text
//! Idle --submit, invalid--> Idle (errors set, no request)
//! Idle --submit, valid----> Submitting --token--------> Authenticated
//!                                      --rejected-----> Idle (password cleared, error on password)
//!                                      --unreachable--> Idle (password cleared, notice set)
//! ```
//!
//! The exchange runs as a spawned task and reports back through a oneshot
//! channel. Hosts call `poll_completion` from their event loop, or await
//! `wait_for_completion`. Dropping or disposing the controller abandons any
//! request in flight without touching session or store.

use std::time::Instant;

use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::{debug, info, warn};

use crate::auth::{AuthClient, ExchangeOutcome};
use crate::config::LANDING_ROUTE;
use crate::session::SessionContext;
use crate::store::IdentifierStore;
use crate::validator::{validate, Credentials, Field, ValidationErrors};

/// Notification shown after a successful login
pub const SIGNED_IN_MESSAGE: &str = "Signed in.";

/// Error placed on the password field for any rejected login.
/// Deliberately does not say which half of the credentials was wrong.
pub const CREDENTIALS_INCORRECT: &str = "ID or password is incorrect.";

/// Form-level notice when the server could not be reached
pub const SERVER_UNREACHABLE: &str = "Unable to reach the server. Please try again.";

/// Route of the password recovery flow
pub const PASSWORD_RECOVERY_ROUTE: &str = "/member/password/email_auth";

/// Route of the sign-up flow
pub const SIGNUP_ROUTE: &str = "/signup";

/// Character used when the password is hidden
const MASK_CHAR: char = '•';

/// The page hosting the login form: shows notifications and navigates.
pub trait LoginHost {
    fn notify_success(&self, message: &str);

    fn redirect(&self, route: &str);
}

impl<H: LoginHost + ?Sized> LoginHost for &H {
    fn notify_success(&self, message: &str) {
        (**self).notify_success(message)
    }

    fn redirect(&self, route: &str) {
        (**self).redirect(route)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginPhase {
    Idle,
    Submitting,
    Authenticated,
}

/// Immediate result of `submit`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Request sent; completion arrives later
    Started,
    /// Validation failed; errors are in the form state
    Invalid,
    /// A request is already in flight, or the flow is over
    Ignored,
}

/// What a completed exchange did to the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginEvent {
    Authenticated,
    Rejected,
    Unreachable,
}

impl LoginEvent {
    pub fn label(&self) -> &'static str {
        match self {
            LoginEvent::Authenticated => "authenticated",
            LoginEvent::Rejected => "rejected",
            LoginEvent::Unreachable => "unreachable",
        }
    }
}

/// Bookkeeping for the request in flight
struct PendingExchange {
    rx: oneshot::Receiver<ExchangeOutcome>,
    identifier: String,
    remember: bool,
    started: Instant,
}

pub struct LoginController<A, S, H> {
    auth: A,
    store: S,
    session: SessionContext,
    host: H,
    landing_route: String,

    // Form state
    identifier: String,
    secret: String,
    show_secret: bool,
    remember: bool,
    errors: ValidationErrors,
    notice: Option<String>,

    phase: LoginPhase,
    pending: Option<PendingExchange>,
    disposed: bool,
}

impl<A, S, H> LoginController<A, S, H> {
    /// Detach from the page. Any request in flight is abandoned and its
    /// result discarded.
    pub fn dispose(&mut self) {
        if self.pending.take().is_some() {
            debug!("Login controller disposed with a request in flight");
        }
        self.disposed = true;
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl<A, S, H> Drop for LoginController<A, S, H> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<A, S, H> LoginController<A, S, H>
where
    A: AuthClient + Clone + Sync + 'static,
    S: IdentifierStore,
    H: LoginHost,
{
    /// Create the controller, pre-filling the ID from the store when one was
    /// remembered.
    pub fn new(auth: A, store: S, session: SessionContext, host: H) -> Self {
        let remembered = match store.get() {
            Ok(remembered) => remembered,
            Err(e) => {
                warn!(error = %e, "Failed to read remembered ID");
                None
            }
        };
        debug!(remembered = remembered.is_some(), "Login form initialized");

        Self {
            auth,
            store,
            session,
            host,
            landing_route: LANDING_ROUTE.to_string(),
            remember: remembered.is_some(),
            identifier: remembered.unwrap_or_default(),
            secret: String::new(),
            show_secret: false,
            errors: ValidationErrors::new(),
            notice: None,
            phase: LoginPhase::Idle,
            pending: None,
            disposed: false,
        }
    }

    pub fn with_landing_route(mut self, route: impl Into<String>) -> Self {
        self.landing_route = route.into();
        self
    }

    // =========================================================================
    // Form state
    // =========================================================================

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn remember(&self) -> bool {
        self.remember
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn error(&self, field: Field) -> Option<&str> {
        self.errors.get(field)
    }

    /// Message not tied to a field, e.g. the server being unreachable
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn phase(&self) -> LoginPhase {
        self.phase
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == LoginPhase::Submitting
    }

    pub fn landing_route(&self) -> &str {
        &self.landing_route
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.identifier.clone(), self.secret.clone())
    }

    /// Password as it should be rendered
    pub fn display_secret(&self) -> String {
        if self.show_secret {
            self.secret.clone()
        } else {
            std::iter::repeat(MASK_CHAR)
                .take(self.secret.chars().count())
                .collect()
        }
    }

    /// The visibility toggle is only offered once something has been typed
    pub fn can_toggle_visibility(&self) -> bool {
        !self.secret.is_empty()
    }

    // =========================================================================
    // Field edits
    // =========================================================================

    pub fn set_identifier(&mut self, value: impl Into<String>) {
        self.identifier = value.into();
        self.errors.clear(Field::Identifier);
    }

    pub fn set_secret(&mut self, value: impl Into<String>) {
        self.secret = value.into();
        self.errors.clear(Field::Secret);
    }

    /// Inline clear button on the ID field
    pub fn clear_identifier(&mut self) {
        self.identifier.clear();
    }

    /// Inline clear button on the password field
    pub fn clear_secret(&mut self) {
        self.secret.clear();
    }

    pub fn toggle_secret_visibility(&mut self) -> bool {
        self.show_secret = !self.show_secret;
        self.show_secret
    }

    pub fn set_remember(&mut self, remember: bool) {
        self.remember = remember;
    }

    // =========================================================================
    // Submission
    // =========================================================================

    /// Validate the form and, if it passes, start the exchange.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn submit(&mut self) -> SubmitOutcome {
        if self.disposed || self.phase != LoginPhase::Idle {
            debug!(phase = ?self.phase, disposed = self.disposed, "Submit ignored");
            return SubmitOutcome::Ignored;
        }

        let credentials = self.credentials();
        let errors = validate(&credentials);
        self.notice = None;

        if !errors.is_empty() {
            debug!(invalid_fields = errors.len(), "Login form invalid");
            self.errors = errors;
            return SubmitOutcome::Invalid;
        }
        self.errors = errors;

        let (mut tx, rx) = oneshot::channel();
        let auth = self.auth.clone();
        let identifier = credentials.identifier.clone();

        tokio::spawn(async move {
            let outcome = tokio::select! {
                result = auth.exchange(&credentials) => ExchangeOutcome::from(result),
                _ = tx.closed() => {
                    debug!("Login form closed, abandoning exchange");
                    return;
                }
            };
            // Receiver may have gone away while the response was parsed
            let _ = tx.send(outcome);
        });

        self.pending = Some(PendingExchange {
            rx,
            identifier,
            remember: self.remember,
            started: Instant::now(),
        });
        self.phase = LoginPhase::Submitting;
        debug!("Login request started");
        SubmitOutcome::Started
    }

    /// Apply the exchange result if it has arrived. Never blocks.
    pub fn poll_completion(&mut self) -> Option<LoginEvent> {
        let pending = self.pending.as_mut()?;
        let outcome = match pending.rx.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Closed) => ExchangeOutcome::Transport("Login task ended".to_string()),
        };
        let pending = self.pending.take()?;
        Some(self.complete(pending, outcome))
    }

    /// Wait for the exchange in flight and apply its result.
    /// Returns `None` when nothing is in flight.
    pub async fn wait_for_completion(&mut self) -> Option<LoginEvent> {
        let rx = &mut self.pending.as_mut()?.rx;
        let outcome = rx
            .await
            .unwrap_or_else(|_| ExchangeOutcome::Transport("Login task ended".to_string()));
        let pending = self.pending.take()?;
        Some(self.complete(pending, outcome))
    }

    fn complete(&mut self, pending: PendingExchange, outcome: ExchangeOutcome) -> LoginEvent {
        let event = match outcome {
            ExchangeOutcome::Token(token) => {
                self.session.login(token);
                self.update_remembered(&pending);

                self.secret.clear();
                self.show_secret = false;
                self.errors = ValidationErrors::new();
                self.phase = LoginPhase::Authenticated;

                self.host.notify_success(SIGNED_IN_MESSAGE);
                self.host.redirect(&self.landing_route);
                LoginEvent::Authenticated
            }
            ExchangeOutcome::Unauthorized => {
                self.secret.clear();
                let mut errors = ValidationErrors::new();
                errors.insert(Field::Secret, CREDENTIALS_INCORRECT);
                self.errors = errors;
                self.phase = LoginPhase::Idle;
                LoginEvent::Rejected
            }
            ExchangeOutcome::Transport(reason) => {
                warn!(reason = %reason, "Login request failed");
                self.secret.clear();
                self.notice = Some(SERVER_UNREACHABLE.to_string());
                self.phase = LoginPhase::Idle;
                LoginEvent::Unreachable
            }
        };

        self.finish_attempt(&pending, event);
        event
    }

    fn update_remembered(&self, pending: &PendingExchange) {
        let result = if pending.remember {
            self.store.set(&pending.identifier)
        } else {
            self.store.clear()
        };
        if let Err(e) = result {
            warn!(error = %e, remember = pending.remember, "Failed to update remembered ID");
        }
    }

    /// Runs after every completed attempt, whatever the outcome
    fn finish_attempt(&self, pending: &PendingExchange, event: LoginEvent) {
        let elapsed_ms = pending.started.elapsed().as_millis() as u64;
        info!(outcome = event.label(), elapsed_ms, "Login attempt finished");
    }
}

// ============================================================================
// Tests
// ============================================================================
