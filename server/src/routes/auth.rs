//! Auth routes: mock credential login.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;

use crate::services::credentials::normalize_login_body;
use crate::services::issuer::IssueError;
use crate::state::AppState;

pub const MSG_CREDENTIALS_REQUIRED: &str = "Email and password are required";
pub const MSG_INVALID_CREDENTIALS: &str = "Invalid Credentials!";

/// Error envelope shared by every failing login response.
#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: &'static str,
}

pub(crate) fn issue_error_to_status(err: IssueError) -> StatusCode {
    match err {
        IssueError::Validation => StatusCode::BAD_REQUEST,
        IssueError::InvalidCredentials => StatusCode::UNAUTHORIZED,
    }
}

pub(crate) fn issue_error_message(err: IssueError) -> &'static str {
    match err {
        IssueError::Validation => MSG_CREDENTIALS_REQUIRED,
        IssueError::InvalidCredentials => MSG_INVALID_CREDENTIALS,
    }
}

fn issue_error_response(err: IssueError) -> Response {
    (issue_error_to_status(err), Json(MessageBody { message: issue_error_message(err) })).into_response()
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `POST /api/login`: validate a credential pair and mint a bearer token.
///
/// The body is read raw so that malformed JSON lands in the same 400 envelope
/// as missing fields instead of Axum's extractor rejection.
pub async fn login(State(state): State<AppState>, body: Bytes) -> Response {
    if !state.login_delay.is_zero() {
        tokio::time::sleep(state.login_delay).await;
    }

    let Some(credential) = normalize_login_body(&body) else {
        tracing::debug!(len = body.len(), "login body matched no accepted shape");
        return issue_error_response(IssueError::Validation);
    };

    match state.issuer.issue(&credential).await {
        Ok(issued) => {
            tracing::info!(expires_at = issued.expires_at, "login succeeded");
            (StatusCode::OK, Json(issued)).into_response()
        }
        Err(e) => {
            tracing::info!(error = %e, "login rejected");
            issue_error_response(e)
        }
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
