//! Application wiring.
//!
//! DESIGN
//! ======
//! `ClientApp` is built once at startup and owns the session store, theme
//! store, route guard and API client. Consumers borrow what they need from
//! it; dropping it ends the session lifecycle. Every mutation is already
//! durable when it returns, so there is nothing to flush on shutdown.

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::net::api::ApiClient;
use crate::state::auth::SessionStore;
use crate::util::auth::RouteGuard;
use crate::util::dark_mode::ThemeStore;
use crate::util::storage::LocalStorage;

#[derive(Clone)]
pub struct ClientApp {
    pub session: SessionStore,
    pub theme: ThemeStore,
    pub guard: RouteGuard,
    pub api: ApiClient,
}

impl ClientApp {
    /// Open storage, rehydrate stores and build the API client.
    ///
    /// # Errors
    ///
    /// [`ClientError::Transport`] if the storage directory cannot be created
    /// or the HTTP client cannot be built.
    pub fn open(config: &ClientConfig) -> Result<Self, ClientError> {
        let storage = LocalStorage::open(&config.storage_dir)?;
        let session = SessionStore::open(storage.clone());
        let theme = ThemeStore::open(storage);
        let guard = RouteGuard::new(session.clone(), config.expiry_policy);
        let api = ApiClient::new(&config.base_url, session.clone(), config.request_timeout)?;

        tracing::debug!(
            storage = %config.storage_dir.display(),
            signed_in = session.read().is_present(),
            "client opened"
        );
        Ok(Self { session, theme, guard, api })
    }
}
