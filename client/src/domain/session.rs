//! Client session state: who is signed in, with what credential.
//!
//! The credential/identity pair is stored as one value so the "credential
//! present ⇔ identity present" invariant holds structurally; sign-out drops
//! the pair as a whole.

use super::auth::AccessToken;
use super::user::User;

/// Authenticated credential/identity pair.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionCredentials {
    token: AccessToken,
    identity: User,
}

impl SessionCredentials {
    /// Pair a bearer token with the identity it was issued for.
    #[must_use]
    pub const fn new(token: AccessToken, identity: User) -> Self {
        Self { token, identity }
    }

    /// Bearer token for gateway calls.
    #[must_use]
    pub const fn token(&self) -> &AccessToken {
        &self.token
    }

    /// Authenticated reviewer identity.
    #[must_use]
    pub const fn identity(&self) -> &User {
        &self.identity
    }
}

/// Request phase of the session state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    /// No authentication request in flight.
    #[default]
    Idle,
    /// A login request is in flight.
    Authenticating,
}

/// Session state as seen by the rest of the application.
///
/// Transitions: anonymous → authenticating → authenticated, or back to the
/// prior state with an error message recorded. Explicit termination always
/// lands on the anonymous state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Session {
    credentials: Option<SessionCredentials>,
    status: SessionStatus,
    error: Option<String>,
}

impl Session {
    /// Anonymous session with no pending request.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Session restored or freshly authenticated with the given pair.
    #[must_use]
    pub const fn authenticated(credentials: SessionCredentials) -> Self {
        Self {
            credentials: Some(credentials),
            status: SessionStatus::Idle,
            error: None,
        }
    }

    /// Whether a credential/identity pair is present.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.credentials.is_some()
    }

    /// Bearer token, when authenticated.
    #[must_use]
    pub const fn token(&self) -> Option<&AccessToken> {
        match &self.credentials {
            Some(credentials) => Some(credentials.token()),
            None => None,
        }
    }

    /// Reviewer identity, when authenticated.
    #[must_use]
    pub const fn identity(&self) -> Option<&User> {
        match &self.credentials {
            Some(credentials) => Some(credentials.identity()),
            None => None,
        }
    }

    /// Current request phase.
    #[must_use]
    pub const fn status(&self) -> SessionStatus {
        self.status
    }

    /// Last recorded failure message, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Mark a login request as started; clears any stale error.
    pub(crate) fn begin_authentication(&mut self) {
        self.status = SessionStatus::Authenticating;
        self.error = None;
    }

    /// Record a successful login.
    pub(crate) fn complete_authentication(&mut self, credentials: SessionCredentials) {
        self.credentials = Some(credentials);
        self.status = SessionStatus::Idle;
        self.error = None;
    }

    /// Record a failed login, leaving any prior pair untouched.
    pub(crate) fn fail_authentication(&mut self, message: String) {
        self.status = SessionStatus::Idle;
        self.error = Some(message);
    }

    /// Drop credentials, identity, and any error unconditionally.
    pub(crate) fn clear(&mut self) {
        self.credentials = None;
        self.status = SessionStatus::Idle;
        self.error = None;
    }

    /// Discard a stale error message.
    pub(crate) fn clear_error(&mut self) {
        self.error = None;
    }
}
