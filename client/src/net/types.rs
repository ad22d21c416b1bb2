//! Wire DTOs for the login endpoint.
//!
//! DESIGN
//! ======
//! Field names follow the server's camelCase JSON. `expires_in` carries an
//! absolute epoch-seconds timestamp despite its name.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// Body of `POST /api/login`.
#[derive(Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// User summary returned on successful login.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginUser {
    pub email: String,
    pub name: String,
}

/// Successful `POST /api/login` response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    /// Absolute expiry in epoch seconds.
    pub expires_in: i64,
    pub user: LoginUser,
}

/// Error envelope returned by failing API calls.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
