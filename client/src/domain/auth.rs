//! Authentication primitives: bearer credentials and login payloads.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before the session manager talks to a port.

use std::fmt;

use zeroize::Zeroizing;

use super::user::{ServiceNumber, User};

/// Domain error returned when credential values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialValidationError {
    /// Token was blank.
    EmptyToken,
    /// Secret was blank.
    EmptySecret,
}

impl fmt::Display for CredentialValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyToken => write!(f, "access token must not be empty"),
            Self::EmptySecret => write!(f, "secret must not be empty"),
        }
    }
}

impl std::error::Error for CredentialValidationError {}

/// Opaque bearer token issued by the login endpoint.
///
/// The raw value is zeroised on drop and never appears in `Debug` output.
///
/// ## Invariants
/// - The token string is non-empty.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(Zeroizing<String>);

impl AccessToken {
    /// Validate and construct an [`AccessToken`] from raw input.
    pub fn new(raw: impl Into<String>) -> Result<Self, CredentialValidationError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(CredentialValidationError::EmptyToken);
        }
        Ok(Self(Zeroizing::new(raw)))
    }

    /// Raw token value for the `Authorization` header and persistence.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(redacted)")
    }
}

/// Login payload sent to the authentication endpoint.
///
/// The service number is the identifier; some deployments additionally
/// require a secret, so it stays optional here and is omitted from the wire
/// payload when absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRequest {
    pj: ServiceNumber,
    secret: Option<Zeroizing<String>>,
}

impl LoginRequest {
    /// Build a request carrying only the service number.
    #[must_use]
    pub const fn new(pj: ServiceNumber) -> Self {
        Self { pj, secret: None }
    }

    /// Attach a non-empty secret for deployments that require one.
    pub fn with_secret(mut self, secret: &str) -> Result<Self, CredentialValidationError> {
        if secret.is_empty() {
            return Err(CredentialValidationError::EmptySecret);
        }
        self.secret = Some(Zeroizing::new(secret.to_owned()));
        Ok(self)
    }

    /// Service number identifying the reviewer.
    #[must_use]
    pub const fn pj(&self) -> &ServiceNumber {
        &self.pj
    }

    /// Secret string, when the deployment requires one.
    #[must_use]
    pub fn secret(&self) -> Option<&str> {
        self.secret.as_deref().map(String::as_str)
    }
}

/// Successful login result: the bearer token plus the reviewer identity.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginOutcome {
    /// Bearer credential for subsequent gateway calls.
    pub token: AccessToken,
    /// Authenticated reviewer identity.
    pub user: User,
}
