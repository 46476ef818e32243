//! Reviewer identity model.
//!
//! Identifiers arriving from the review service are opaque strings, so the
//! newtypes here validate shape (non-empty, no stray whitespace) rather than
//! any particular encoding. Serialisation contracts mirror the service's
//! JSON payloads and are documented on each type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Validation errors returned by the identity constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// User id was missing or blank once trimmed.
    EmptyId,
    /// User id contained leading or trailing whitespace.
    PaddedId,
    /// Service number was missing or blank once trimmed.
    EmptyServiceNumber,
    /// Service number contained characters outside `A-Z`, `a-z`, `0-9`.
    InvalidServiceNumber,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::PaddedId => write!(f, "user id must not carry surrounding whitespace"),
            Self::EmptyServiceNumber => write!(f, "service number must not be empty"),
            Self::InvalidServiceNumber => {
                write!(f, "service number may only contain letters and digits")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable reviewer identifier assigned by the review service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl Into<String>) -> Result<Self, UserValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::PaddedId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Judicial service number used as the login identifier (for example
/// `PJ1001`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ServiceNumber(String);

impl ServiceNumber {
    /// Validate and construct a [`ServiceNumber`] from raw input.
    ///
    /// The input is trimmed; the remainder must be non-empty and purely
    /// alphanumeric.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyServiceNumber);
        }
        if !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(UserValidationError::InvalidServiceNumber);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for ServiceNumber {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ServiceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<ServiceNumber> for String {
    fn from(value: ServiceNumber) -> Self {
        value.0
    }
}

impl TryFrom<String> for ServiceNumber {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Access level granted to an authenticated reviewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// Full registry oversight: section edits, strikes, and reports.
    #[serde(rename = "admin")]
    Administrator,
    /// Reads sections and submits feedback entries.
    #[serde(rename = "user")]
    Standard,
}

impl Role {
    /// Whether this role may use the administrator endpoints.
    #[must_use]
    pub const fn is_administrator(self) -> bool {
        matches!(self, Self::Administrator)
    }
}

/// Authenticated reviewer identity as returned by the login endpoint.
///
/// ## Invariants
/// - `id` and `pj` satisfy their newtype validation.
///
/// # Examples
/// ```
/// use client::domain::{Role, User};
///
/// let user = User::try_from_strings("64a1", "PJ1001", Role::Standard)
///     .expect("valid identity");
/// assert_eq!(user.pj().as_ref(), "PJ1001");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(try_from = "UserDto", into = "UserDto")]
pub struct User {
    id: UserId,
    pj: ServiceNumber,
    role: Role,
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
}

impl User {
    /// Build a new [`User`] from validated components.
    #[must_use]
    pub const fn new(id: UserId, pj: ServiceNumber, role: Role) -> Self {
        Self {
            id,
            pj,
            role,
            first_name: None,
            last_name: None,
            email: None,
        }
    }

    /// Fallible constructor from raw string inputs.
    pub fn try_from_strings(
        id: impl Into<String>,
        pj: impl AsRef<str>,
        role: Role,
    ) -> Result<Self, UserValidationError> {
        Ok(Self::new(UserId::new(id)?, ServiceNumber::new(pj)?, role))
    }

    /// Attach the optional profile fields returned by the admin view.
    #[must_use]
    pub fn with_profile(
        mut self,
        first_name: Option<String>,
        last_name: Option<String>,
        email: Option<String>,
    ) -> Self {
        self.first_name = first_name;
        self.last_name = last_name;
        self.email = email;
        self
    }

    /// Stable reviewer identifier.
    #[must_use]
    pub const fn id(&self) -> &UserId {
        &self.id
    }

    /// Judicial service number used at login.
    #[must_use]
    pub const fn pj(&self) -> &ServiceNumber {
        &self.pj
    }

    /// Access level for this reviewer.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Given name, when the service supplied one.
    #[must_use]
    pub fn first_name(&self) -> Option<&str> {
        self.first_name.as_deref()
    }

    /// Family name, when the service supplied one.
    #[must_use]
    pub fn last_name(&self) -> Option<&str> {
        self.last_name.as_deref()
    }

    /// Contact email, when the service supplied one.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Salutation line for display: full name when known, else the service
    /// number.
    #[must_use]
    pub fn salutation(&self) -> String {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(only), None) | (None, Some(only)) => only.to_owned(),
            (None, None) => self.pj.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserDto {
    #[serde(rename = "_id", alias = "id")]
    id: String,
    pj: String,
    role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    email: Option<String>,
}

impl From<User> for UserDto {
    fn from(value: User) -> Self {
        let User {
            id,
            pj,
            role,
            first_name,
            last_name,
            email,
        } = value;
        Self {
            id: id.into(),
            pj: pj.into(),
            role,
            first_name,
            last_name,
            email,
        }
    }
}

impl TryFrom<UserDto> for User {
    type Error = UserValidationError;

    fn try_from(value: UserDto) -> Result<Self, Self::Error> {
        let UserDto {
            id,
            pj,
            role,
            first_name,
            last_name,
            email,
        } = value;
        Ok(User::try_from_strings(id, pj, role)?.with_profile(first_name, last_name, email))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", UserValidationError::EmptyId)]
    #[case(" 64a1 ", UserValidationError::PaddedId)]
    fn rejects_malformed_user_ids(#[case] raw: &str, #[case] expected: UserValidationError) {
        let err = UserId::new(raw).expect_err("invalid id must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("", UserValidationError::EmptyServiceNumber)]
    #[case("   ", UserValidationError::EmptyServiceNumber)]
    #[case("PJ 10", UserValidationError::InvalidServiceNumber)]
    #[case("PJ-10", UserValidationError::InvalidServiceNumber)]
    fn rejects_malformed_service_numbers(
        #[case] raw: &str,
        #[case] expected: UserValidationError,
    ) {
        let err = ServiceNumber::new(raw).expect_err("invalid number must fail");
        assert_eq!(err, expected);
    }

    #[test]
    fn service_number_trims_surrounding_whitespace() {
        let pj = ServiceNumber::new("  PJ1001  ").expect("valid once trimmed");
        assert_eq!(pj.as_ref(), "PJ1001");
    }

    #[test]
    fn user_round_trips_through_wire_shape() {
        let raw = r#"{"_id":"64a1","pj":"PJ1001","role":"user","firstName":"Roseline"}"#;
        let user: User = serde_json::from_str(raw).expect("wire payload should decode");
        assert_eq!(user.role(), Role::Standard);
        assert_eq!(user.first_name(), Some("Roseline"));

        let encoded = serde_json::to_string(&user).expect("identity should encode");
        let decoded: User = serde_json::from_str(&encoded).expect("round trip should decode");
        assert_eq!(decoded, user);
    }

    #[rstest]
    #[case(Some("Roseline"), Some("Korir"), "Roseline Korir")]
    #[case(Some("Roseline"), None, "Roseline")]
    #[case(None, None, "PJ1001")]
    fn salutation_prefers_full_name(
        #[case] first: Option<&str>,
        #[case] last: Option<&str>,
        #[case] expected: &str,
    ) {
        let user = User::try_from_strings("64a1", "PJ1001", Role::Standard)
            .expect("valid identity")
            .with_profile(
                first.map(str::to_owned),
                last.map(str::to_owned),
                None,
            );
        assert_eq!(user.salutation(), expected);
    }
}
