//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the token issuer and the artificial login delay. The issuer is
//! stateless, so cloning the state per request is cheap.

use std::sync::Arc;
use std::time::Duration;

use crate::config::ServerConfig;
use crate::services::credentials::{CredentialVerifier, StaticCredentials};
use crate::services::issuer::TokenIssuer;
use crate::services::token::{RandomHexMinter, TokenMinter};

// =============================================================================
// APP STATE
// =============================================================================

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped or Copy.
#[derive(Clone)]
pub struct AppState {
    pub issuer: Arc<TokenIssuer>,
    /// Applied before answering each login attempt.
    pub login_delay: Duration,
}

impl AppState {
    #[must_use]
    pub fn new(issuer: TokenIssuer, login_delay: Duration) -> Self {
        Self { issuer: Arc::new(issuer), login_delay }
    }

    /// Wire the default collaborators (single static account, random hex tokens).
    #[must_use]
    pub fn from_config(config: &ServerConfig) -> Self {
        let verifier: Arc<dyn CredentialVerifier> = Arc::new(StaticCredentials::new(config.account.clone()));
        let minter: Arc<dyn TokenMinter> = Arc::new(RandomHexMinter);
        Self::new(TokenIssuer::new(verifier, minter, config.token_ttl), config.login_delay)
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use super::*;

    /// Default-config state with no login delay.
    #[must_use]
    pub fn test_app_state() -> AppState {
        AppState::from_config(&ServerConfig::default())
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
