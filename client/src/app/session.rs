//! Session manager: login, sign-out, and restore-on-startup.
//!
//! Owns the [`Session`] state and the persisted credential copies. Storage
//! failures never take the session down: the in-memory state is the
//! authority and store errors are logged and absorbed.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::ports::{
    AuthenticationError, AuthenticationService, CredentialStore, IDENTITY_KEY, TOKEN_KEY,
};
use crate::domain::{AccessToken, LoginRequest, Session, SessionCredentials, User};

/// Fallback message when the service supplies no wording of its own.
const AUTH_FALLBACK_MESSAGE: &str = "Authentication failed";

/// Error returned by [`SessionManager::authenticate`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct AuthenticationFailed {
    /// Human-readable failure message, also recorded on the session.
    pub message: String,
}

/// Drives the session state machine against the authentication port and the
/// credential store.
pub struct SessionManager<A, S> {
    auth: Arc<A>,
    store: Arc<S>,
    session: Session,
}

impl<A, S> SessionManager<A, S>
where
    A: AuthenticationService,
    S: CredentialStore,
{
    /// Reconstruct session state from persisted storage.
    ///
    /// A missing token or identity yields an anonymous session. A present
    /// token with a malformed identity clears both persisted copies: the
    /// pair is only ever stored and dropped together.
    pub fn restore(auth: Arc<A>, store: Arc<S>) -> Self {
        let session = Self::restore_session(store.as_ref());
        Self {
            auth,
            store,
            session,
        }
    }

    fn restore_session(store: &S) -> Session {
        let token = match store.get(TOKEN_KEY) {
            Ok(value) => value,
            Err(err) => {
                warn!(error = %err, "credential store read failed during restore");
                return Session::anonymous();
            }
        };
        let identity = match store.get(IDENTITY_KEY) {
            Ok(value) => value,
            Err(err) => {
                warn!(error = %err, "credential store read failed during restore");
                return Session::anonymous();
            }
        };

        let (Some(token), Some(identity)) = (token, identity) else {
            return Session::anonymous();
        };

        let parsed: Result<User, _> = serde_json::from_str(&identity);
        let token = AccessToken::new(token);
        match (token, parsed) {
            (Ok(token), Ok(user)) => {
                debug!(pj = %user.pj(), "session restored from storage");
                Session::authenticated(SessionCredentials::new(token, user))
            }
            _ => {
                warn!("persisted identity is malformed; clearing stored credentials");
                Self::clear_store(store);
                Session::anonymous()
            }
        }
    }

    fn clear_store(store: &S) {
        for key in [TOKEN_KEY, IDENTITY_KEY] {
            if let Err(err) = store.remove(key) {
                warn!(key, error = %err, "credential store remove failed");
            }
        }
    }

    fn persist(store: &S, credentials: &SessionCredentials) {
        if let Err(err) = store.set(TOKEN_KEY, credentials.token().as_str()) {
            warn!(error = %err, "failed to persist token");
        }
        match serde_json::to_string(credentials.identity()) {
            Ok(encoded) => {
                if let Err(err) = store.set(IDENTITY_KEY, &encoded) {
                    warn!(error = %err, "failed to persist identity");
                }
            }
            Err(err) => warn!(error = %err, "failed to encode identity for persistence"),
        }
    }

    /// Exchange a login request for an authenticated session.
    ///
    /// On success the credential pair is stored in memory and persisted. On
    /// failure the session records the service's message (or a generic
    /// fallback) and any previously authenticated state is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`AuthenticationFailed`] carrying the same message recorded
    /// on the session.
    pub async fn authenticate(
        &mut self,
        request: &LoginRequest,
    ) -> Result<&User, AuthenticationFailed> {
        self.session.begin_authentication();
        match self.auth.authenticate(request).await {
            Ok(outcome) => {
                let credentials = SessionCredentials::new(outcome.token, outcome.user);
                Self::persist(self.store.as_ref(), &credentials);
                self.session.complete_authentication(credentials);
                debug!(pj = %request.pj(), "login succeeded");
                self.session
                    .identity()
                    .ok_or_else(|| AuthenticationFailed {
                        message: AUTH_FALLBACK_MESSAGE.to_owned(),
                    })
            }
            Err(err) => {
                let message = match err {
                    AuthenticationError::Rejected { message } => message,
                    other => {
                        debug!(error = %other, "login failed before the service answered");
                        AUTH_FALLBACK_MESSAGE.to_owned()
                    }
                };
                self.session.fail_authentication(message.clone());
                Err(AuthenticationFailed { message })
            }
        }
    }

    /// Clear identity, credential, and persisted copies unconditionally.
    pub fn terminate(&mut self) {
        Self::clear_store(self.store.as_ref());
        self.session.clear();
        debug!("session terminated");
    }

    /// Discard a stale error message.
    pub fn clear_error(&mut self) {
        self.session.clear_error();
    }

    /// Current session state.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Bearer token, when authenticated.
    #[must_use]
    pub const fn token(&self) -> Option<&AccessToken> {
        self.session.token()
    }

    /// Reviewer identity, when authenticated.
    #[must_use]
    pub const fn identity(&self) -> Option<&User> {
        self.session.identity()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::{
        FixtureAuthenticationService, InMemoryCredentialStore, MockAuthenticationService,
    };
    use crate::domain::{ServiceNumber, SessionStatus};
    use rstest::rstest;

    fn request(pj: &str) -> LoginRequest {
        LoginRequest::new(ServiceNumber::new(pj).expect("valid number"))
    }

    #[rstest]
    #[tokio::test]
    async fn successful_login_persists_both_keys() {
        let store = Arc::new(InMemoryCredentialStore::new());
        let mut manager =
            SessionManager::restore(Arc::new(FixtureAuthenticationService), Arc::clone(&store));

        manager
            .authenticate(&request("PJ1001"))
            .await
            .expect("login should succeed");

        assert!(manager.session().is_authenticated());
        assert!(store.get(TOKEN_KEY).expect("get succeeds").is_some());
        assert!(store.get(IDENTITY_KEY).expect("get succeeds").is_some());
    }

    #[rstest]
    #[tokio::test]
    async fn authenticate_then_restore_yields_the_same_identity() {
        let store = Arc::new(InMemoryCredentialStore::new());
        let auth = Arc::new(FixtureAuthenticationService);
        let mut manager = SessionManager::restore(Arc::clone(&auth), Arc::clone(&store));
        manager
            .authenticate(&request("PJ1001"))
            .await
            .expect("login should succeed");
        let before = manager.session().clone();

        let restored = SessionManager::restore(auth, store);

        assert_eq!(restored.session().identity(), before.identity());
        assert_eq!(
            restored.session().token().map(AccessToken::as_str),
            before.token().map(AccessToken::as_str)
        );
    }

    #[rstest]
    #[tokio::test]
    async fn rejected_login_records_the_service_message() {
        let store = Arc::new(InMemoryCredentialStore::new());
        let mut manager =
            SessionManager::restore(Arc::new(FixtureAuthenticationService), store);

        let err = manager
            .authenticate(&request("PJ0000"))
            .await
            .expect_err("unknown number must fail");

        assert_eq!(err.message, "Unauthorized PJ Number");
        assert_eq!(manager.session().error(), Some("Unauthorized PJ Number"));
        assert_eq!(manager.session().status(), SessionStatus::Idle);
        assert!(!manager.session().is_authenticated());
    }

    #[rstest]
    #[tokio::test]
    async fn transport_failure_falls_back_to_the_generic_message() {
        let mut auth = MockAuthenticationService::new();
        auth.expect_authenticate()
            .returning(|_| Err(AuthenticationError::transport("connection refused")));
        let mut manager = SessionManager::restore(
            Arc::new(auth),
            Arc::new(InMemoryCredentialStore::new()),
        );

        let err = manager
            .authenticate(&request("PJ1001"))
            .await
            .expect_err("transport failure must surface");

        assert_eq!(err.message, AUTH_FALLBACK_MESSAGE);
    }

    #[rstest]
    #[tokio::test]
    async fn terminate_clears_memory_and_storage_from_any_state() {
        let store = Arc::new(InMemoryCredentialStore::new());
        let mut manager =
            SessionManager::restore(Arc::new(FixtureAuthenticationService), Arc::clone(&store));
        manager
            .authenticate(&request("PJ1001"))
            .await
            .expect("login should succeed");

        manager.terminate();

        assert!(!manager.session().is_authenticated());
        assert_eq!(store.get(TOKEN_KEY).expect("get succeeds"), None);
        assert_eq!(store.get(IDENTITY_KEY).expect("get succeeds"), None);
    }

    #[test]
    fn restore_with_malformed_identity_clears_both_keys() {
        let store = Arc::new(InMemoryCredentialStore::new());
        store.set(TOKEN_KEY, "jwt").expect("set succeeds");
        store
            .set(IDENTITY_KEY, "{not json")
            .expect("set succeeds");

        let manager =
            SessionManager::restore(Arc::new(FixtureAuthenticationService), Arc::clone(&store));

        assert!(!manager.session().is_authenticated());
        assert_eq!(store.get(TOKEN_KEY).expect("get succeeds"), None);
        assert_eq!(store.get(IDENTITY_KEY).expect("get succeeds"), None);
    }

    #[test]
    fn restore_with_no_persisted_state_is_anonymous() {
        let manager = SessionManager::restore(
            Arc::new(FixtureAuthenticationService),
            Arc::new(InMemoryCredentialStore::new()),
        );
        assert!(!manager.session().is_authenticated());
        assert!(manager.session().error().is_none());
    }
}
