//! Driven port for the login endpoint.
//!
//! The session manager calls this port to exchange a service number for a
//! bearer token and identity without knowing the transport behind it, which
//! keeps session tests deterministic: they substitute a double instead of a
//! live endpoint.

use async_trait::async_trait;

use crate::domain::auth::{AccessToken, LoginOutcome, LoginRequest};
use crate::domain::user::{Role, User};

use super::define_port_error;

define_port_error! {
    /// Errors surfaced while authenticating.
    pub enum AuthenticationError {
        /// The service refused the credentials; carries the service's own
        /// wording when it supplied any.
        Rejected => "authentication rejected: {message}",
        /// Network transport failed before a response arrived.
        Transport => "authentication transport failed: {message}",
        /// The login call exceeded its timeout.
        Timeout => "authentication timed out: {message}",
        /// The response body could not be decoded.
        Decode => "authentication response decode failed: {message}",
    }
}

/// Port for exchanging login credentials for a session.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthenticationService: Send + Sync {
    /// Authenticate one login request.
    async fn authenticate(
        &self,
        request: &LoginRequest,
    ) -> Result<LoginOutcome, AuthenticationError>;
}

/// In-memory authenticator used by tests and offline demos.
///
/// `PJ1001` authenticates as a standard reviewer and `PJ9000` as an
/// administrator; anything else is rejected with the service's stock
/// wording.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAuthenticationService;

impl FixtureAuthenticationService {
    fn known_identity(pj: &str) -> Option<Role> {
        match pj {
            "PJ1001" => Some(Role::Standard),
            "PJ9000" => Some(Role::Administrator),
            _ => None,
        }
    }
}

#[async_trait]
impl AuthenticationService for FixtureAuthenticationService {
    async fn authenticate(
        &self,
        request: &LoginRequest,
    ) -> Result<LoginOutcome, AuthenticationError> {
        let pj = request.pj().as_ref();
        let role = Self::known_identity(pj)
            .ok_or_else(|| AuthenticationError::rejected("Unauthorized PJ Number"))?;
        let token = AccessToken::new(format!("fixture-token-{pj}"))
            .map_err(|err| AuthenticationError::decode(err.to_string()))?;
        let user = User::try_from_strings(format!("fixture-{pj}"), pj, role)
            .map_err(|err| AuthenticationError::decode(err.to_string()))?;
        Ok(LoginOutcome { token, user })
    }
}
