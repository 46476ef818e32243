//! Reqwest-backed authentication adapter.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use crate::domain::ports::{AuthenticationError, AuthenticationService};
use crate::domain::{AccessToken, LoginOutcome, LoginRequest};

use super::dto::{LoginBodyDto, LoginResponseDto};
use super::{server_message, status_detail};

/// Authentication adapter performing `POST /users/login` against one base
/// URL.
pub struct HttpAuthenticationService {
    client: Client,
    base: Url,
}

impl HttpAuthenticationService {
    /// Build the adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base })
    }

    fn login_endpoint(&self) -> Result<Url, AuthenticationError> {
        let mut url = self.base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| AuthenticationError::decode("base URL cannot carry paths"))?;
            path.pop_if_empty().extend(["users", "login"]);
        }
        Ok(url)
    }
}

fn map_transport_error(error: &reqwest::Error) -> AuthenticationError {
    if error.is_timeout() {
        AuthenticationError::timeout(error.to_string())
    } else {
        AuthenticationError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> AuthenticationError {
    if let Some(message) = server_message(body) {
        return AuthenticationError::rejected(message);
    }
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            AuthenticationError::timeout(status_detail(status, body))
        }
        _ if status.is_client_error() => {
            AuthenticationError::rejected(status_detail(status, body))
        }
        _ => AuthenticationError::transport(status_detail(status, body)),
    }
}

#[async_trait]
impl AuthenticationService for HttpAuthenticationService {
    async fn authenticate(
        &self,
        request: &LoginRequest,
    ) -> Result<LoginOutcome, AuthenticationError> {
        let body = LoginBodyDto {
            pj: request.pj().as_ref(),
            password: request.secret(),
        };
        let response = self
            .client
            .post(self.login_endpoint()?)
            .json(&body)
            .send()
            .await
            .map_err(|err| map_transport_error(&err))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|err| map_transport_error(&err))?;
        if !status.is_success() {
            return Err(map_status_error(status, bytes.as_ref()));
        }

        let decoded: LoginResponseDto = serde_json::from_slice(bytes.as_ref())
            .map_err(|err| AuthenticationError::decode(format!("invalid login payload: {err}")))?;
        let token = AccessToken::new(decoded.token)
            .map_err(|err| AuthenticationError::decode(err.to_string()))?;
        Ok(LoginOutcome {
            token,
            user: decoded.data,
        })
    }
}
