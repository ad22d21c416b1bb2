//! REST API helpers for communicating with the server.
//!
//! SYSTEM CONTEXT
//! ==============
//! The login surface calls [`ApiClient::login`], which runs the issuer call
//! and the session commit in sequence. Screens that talk to downstream
//! resources go through [`ApiClient::send_authorized`], which attaches the
//! bearer token and turns a 401 into a session clear plus a redirect hint.
//!
//! ERROR HANDLING
//! ==============
//! Callers get a [`ClientError`] instead of panics. Network failures and
//! undecodable responses are transport errors and never touch the session.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::time::Duration;

use reqwest::{Method, StatusCode};

use super::types::{ErrorBody, LoginRequest, LoginResponse};
use crate::error::ClientError;
use crate::state::auth::SessionStore;

pub const LOGIN_ENDPOINT: &str = "/api/login";
pub const HEALTH_ENDPOINT: &str = "/healthz";

pub const MSG_FILL_REQUIRED: &str = "Fill required fields.";
pub const MSG_LOGIN_FAILED: &str = "Login failed";
pub const MSG_NOT_SIGNED_IN: &str = "Not signed in.";
pub const MSG_SESSION_EXPIRED: &str = "Session expired. Please log in again.";

fn request_failed_message(status: u16) -> String {
    format!("request failed: {status}")
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionStore,
}

impl ApiClient {
    /// Build a client with its own HTTP connection pool.
    ///
    /// # Errors
    ///
    /// [`ClientError::Transport`] if the HTTP client cannot be constructed.
    pub fn new(base_url: &str, session: SessionStore, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(http, base_url, session))
    }

    #[must_use]
    pub fn with_client(http: reqwest::Client, base_url: &str, session: SessionStore) -> Self {
        Self { http, base_url: base_url.trim_end_matches('/').to_owned(), session }
    }

    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    fn endpoint(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }

    /// `GET /healthz`.
    ///
    /// # Errors
    ///
    /// [`ClientError::Transport`] if the server is unreachable or unhealthy.
    pub async fn ping(&self) -> Result<(), ClientError> {
        let resp = self.http.get(self.endpoint(HEALTH_ENDPOINT)).send().await?;
        if !resp.status().is_success() {
            return Err(ClientError::Transport(request_failed_message(resp.status().as_u16())));
        }
        Ok(())
    }

    /// Exchange credentials for a token and commit it to the session store.
    ///
    /// The session is only written after a successful, fully decoded
    /// response; every failure leaves it as it was.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Validation`] for empty fields (no request is sent) or
    ///   a 400 from the server.
    /// - [`ClientError::Authentication`] for a 401/403.
    /// - [`ClientError::Transport`] for network, decode, storage, or other
    ///   HTTP failures.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ClientError> {
        if email.is_empty() || password.is_empty() {
            return Err(ClientError::Validation(MSG_FILL_REQUIRED.to_owned()));
        }

        let resp = self
            .http
            .post(self.endpoint(LOGIN_ENDPOINT))
            .json(&LoginRequest { email, password })
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "login request failed");
                ClientError::from(e)
            })?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| MSG_LOGIN_FAILED.to_owned());
            tracing::info!(status = status.as_u16(), "login rejected");
            return Err(login_error(status, message));
        }

        let login: LoginResponse = resp.json().await?;
        self.session
            .commit(login.access_token.clone(), login.expires_in)?;
        tracing::info!(expires_at = login.expires_in, "logged in");
        Ok(login)
    }

    /// Drop the current session.
    ///
    /// # Errors
    ///
    /// [`ClientError::Transport`] if the cleared state cannot be persisted.
    pub fn logout(&self) -> Result<(), ClientError> {
        self.session.clear()?;
        tracing::info!("logged out");
        Ok(())
    }

    /// Call a downstream resource with `Authorization: Bearer <token>`.
    ///
    /// Returns the decoded JSON body, or `Value::Null` for an empty body.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Authentication`] when no session is present (nothing
    ///   is sent) or the server answers 401; the latter also clears the
    ///   session if it still holds the token that was rejected.
    /// - [`ClientError::Transport`] for network, decode, or non-401 HTTP
    ///   failures. The session is untouched.
    pub async fn send_authorized(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<serde_json::Value, ClientError> {
        let Some(token) = self.session.read().token().map(str::to_owned) else {
            return Err(ClientError::Authentication(MSG_NOT_SIGNED_IN.to_owned()));
        };

        let mut req = self
            .http
            .request(method, self.endpoint(path))
            .bearer_auth(&token);
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req.send().await?;
        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            match self.session.clear_if_current(&token) {
                Ok(cleared) => tracing::info!(cleared, "downstream rejected session"),
                Err(e) => tracing::warn!(error = %e, "failed to clear rejected session"),
            }
            return Err(ClientError::Authentication(MSG_SESSION_EXPIRED.to_owned()));
        }
        if !status.is_success() {
            return Err(ClientError::Transport(request_failed_message(status.as_u16())));
        }

        let text = resp.text().await?;
        if text.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| ClientError::Transport(e.to_string()))
    }
}

fn login_error(status: StatusCode, message: String) -> ClientError {
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ClientError::Validation(message),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ClientError::Authentication(message),
        _ => ClientError::Transport(message),
    }
}
