//! Client error taxonomy.
//!
//! ERROR HANDLING
//! ==============
//! Every fallible client operation returns one of three recoverable kinds.
//! Validation messages are shown verbatim, authentication failures send the
//! user back to the login surface, and transport failures (network or
//! storage) are shown generically and never change session state.

use crate::util::auth::LOGIN_PATH;
use crate::util::storage::StorageError;

pub const MSG_SOMETHING_WENT_WRONG: &str = "Something went wrong.";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Authentication(String),
    #[error("transport failure: {0}")]
    Transport(String),
}

impl ClientError {
    /// Text suitable for showing to the user.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::Validation(message) | Self::Authentication(message) => message,
            Self::Transport(_) => MSG_SOMETHING_WENT_WRONG,
        }
    }

    /// Where the surface should navigate after this error, if anywhere.
    #[must_use]
    pub fn redirect_target(&self) -> Option<&'static str> {
        match self {
            Self::Authentication(_) => Some(LOGIN_PATH),
            Self::Validation(_) | Self::Transport(_) => None,
        }
    }
}

impl From<StorageError> for ClientError {
    fn from(value: StorageError) -> Self {
        Self::Transport(value.to_string())
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value.to_string())
    }
}
