//! Credential normalization and verification.
//!
//! SYSTEM CONTEXT
//! ==============
//! Login requests arrive either flat (`{ email, password }`) or wrapped in a
//! legacy envelope (`{ body: { email, password } }`). Both shapes collapse to
//! one [`Credential`] here, before the issuer sees anything.

use serde::Deserialize;

use crate::config::MockAccount;

/// A transient identifier/secret pair. Never persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub identifier: String,
    pub secret: String,
}

impl Credential {
    #[must_use]
    pub fn new(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        Self { identifier: identifier.into(), secret: secret.into() }
    }

    /// Both fields are non-empty.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.identifier.is_empty() && !self.secret.is_empty()
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("identifier", &self.identifier)
            .field("secret", &"<redacted>")
            .finish()
    }
}

// =============================================================================
// REQUEST BODY NORMALIZATION
// =============================================================================

#[derive(Debug, Default, Deserialize)]
struct CredentialFields {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    password: Option<String>,
}

impl From<CredentialFields> for Credential {
    fn from(fields: CredentialFields) -> Self {
        Self {
            identifier: fields.email.unwrap_or_default(),
            secret: fields.password.unwrap_or_default(),
        }
    }
}

/// Parse a raw login body into a [`Credential`].
///
/// An object-valued `body` field is the whole credential: when it fails to
/// parse there is no fallback to the top-level fields. Any other `body`
/// value is ignored and the top level is read instead.
///
/// Returns `None` when the bytes are not a JSON object or the chosen object
/// has a non-string `email`/`password`. Missing fields become empty strings
/// so the issuer can reject them uniformly.
#[must_use]
pub fn normalize_login_body(raw: &[u8]) -> Option<Credential> {
    let value: serde_json::Value = serde_json::from_slice(raw).ok()?;
    let object = value.as_object()?;
    let fields = match object.get("body") {
        Some(nested @ serde_json::Value::Object(_)) => CredentialFields::deserialize(nested).ok()?,
        _ => CredentialFields::deserialize(&value).ok()?,
    };
    Some(fields.into())
}

// =============================================================================
// VERIFICATION
// =============================================================================

/// Identity attached to a verified credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub email: String,
    pub name: String,
}

/// Checks a credential against whatever backs the login endpoint.
#[async_trait::async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Return the matching principal, or `None` on mismatch.
    async fn verify(&self, credential: &Credential) -> Option<Principal>;
}

/// Single hard-coded account, compared by exact equality.
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    account: MockAccount,
}

impl StaticCredentials {
    #[must_use]
    pub fn new(account: MockAccount) -> Self {
        Self { account }
    }
}

#[async_trait::async_trait]
impl CredentialVerifier for StaticCredentials {
    async fn verify(&self, credential: &Credential) -> Option<Principal> {
        if credential.identifier == self.account.email && credential.secret == self.account.password {
            Some(Principal { email: self.account.email.clone(), name: self.account.name.clone() })
        } else {
            None
        }
    }
}

#[cfg(test)]
#[path = "credentials_test.rs"]
mod tests;
