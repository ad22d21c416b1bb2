//! Token issuer: validates a credential and mints a bearer token.
//!
//! ARCHITECTURE
//! ============
//! The issuer is stateless between calls. It owns two collaborators behind
//! trait objects: a [`CredentialVerifier`] deciding whether the pair is valid
//! and a [`TokenMinter`] producing the opaque token value.
//!
//! TRADE-OFFS
//! ==========
//! Validation and mismatch failures share one response envelope and differ
//! only in status and message. This is a mock boundary; timing is not
//! equalized between the two paths.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use super::credentials::{Credential, CredentialVerifier, Principal};
use super::token::TokenMinter;

pub const TOKEN_TYPE: &str = "Bearer";

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IssueError {
    #[error("identifier and secret are required")]
    Validation,
    #[error("invalid credentials")]
    InvalidCredentials,
}

/// User summary returned alongside a freshly issued token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuedUser {
    pub email: String,
    pub name: String,
}

impl From<Principal> for IssuedUser {
    fn from(p: Principal) -> Self {
        Self { email: p.email, name: p.name }
    }
}

/// Successful login result. Serializes to the wire shape of `POST /api/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedToken {
    pub access_token: String,
    pub token_type: String,
    /// Absolute expiry in epoch seconds (named `expiresIn` on the wire).
    #[serde(rename = "expiresIn")]
    pub expires_at: i64,
    pub user: IssuedUser,
}

#[derive(Clone)]
pub struct TokenIssuer {
    verifier: Arc<dyn CredentialVerifier>,
    minter: Arc<dyn TokenMinter>,
    validity: Duration,
}

impl TokenIssuer {
    #[must_use]
    pub fn new(verifier: Arc<dyn CredentialVerifier>, minter: Arc<dyn TokenMinter>, validity: Duration) -> Self {
        Self { verifier, minter, validity }
    }

    #[must_use]
    pub fn validity(&self) -> Duration {
        self.validity
    }

    /// Issue a token for `credential` using the current wall-clock time.
    ///
    /// # Errors
    ///
    /// [`IssueError::Validation`] if either field is empty,
    /// [`IssueError::InvalidCredentials`] if the pair does not match.
    pub async fn issue(&self, credential: &Credential) -> Result<IssuedToken, IssueError> {
        self.issue_at(credential, now_epoch_secs()).await
    }

    /// Issue with an explicit `now` (epoch seconds), for deterministic tests.
    pub(crate) async fn issue_at(&self, credential: &Credential, now: i64) -> Result<IssuedToken, IssueError> {
        if !credential.is_complete() {
            return Err(IssueError::Validation);
        }

        let principal = self
            .verifier
            .verify(credential)
            .await
            .ok_or(IssueError::InvalidCredentials)?;

        Ok(IssuedToken {
            access_token: self.minter.mint(),
            token_type: TOKEN_TYPE.to_owned(),
            expires_at: expiry_from(now, self.validity),
            user: principal.into(),
        })
    }
}

#[must_use]
pub fn now_epoch_secs() -> i64 {
    time::OffsetDateTime::now_utc().unix_timestamp()
}

pub(crate) fn expiry_from(now: i64, validity: Duration) -> i64 {
    let secs = i64::try_from(validity.as_secs()).unwrap_or(i64::MAX);
    now.saturating_add(secs)
}

#[cfg(test)]
#[path = "issuer_test.rs"]
mod tests;
