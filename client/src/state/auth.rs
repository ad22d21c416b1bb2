//! Auth-session state for the current client.
//!
//! SYSTEM CONTEXT
//! ==============
//! Holds the bearer token and its expiry. The login surface commits a token
//! after a successful issuer call, logout and downstream 401 handling clear
//! it, and route guards read it to decide render-vs-redirect.
//!
//! DESIGN
//! ======
//! One `SessionStore` handle is created at application start and passed to
//! every consumer; clones share state. The token/expiry pair lives in a single
//! `Option` so one can never be set without the other. Mutations hold the
//! store mutex across the durable write, so they are serialized. Readers go
//! through the watch channel's snapshot instead of that mutex: they never wait
//! on disk I/O and only ever see a whole published session. The store never
//! sweeps expired sessions; staleness is the guard's call.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::error::ClientError;
use crate::util::storage::{LocalStorage, Persisted};

/// Fixed storage namespace for the persisted session.
pub const SESSION_STORAGE_KEY: &str = "auth-storage";

// =============================================================================
// SESSION
// =============================================================================

/// A committed bearer token and its absolute expiry (epoch seconds).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionToken {
    pub token: String,
    pub expires_at: i64,
}

/// Snapshot of the session: either both fields present or both absent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    current: Option<SessionToken>,
}

impl Session {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_token(token: impl Into<String>, expires_at: i64) -> Self {
        Self { current: Some(SessionToken { token: token.into(), expires_at }) }
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.current.as_ref().map(|t| t.token.as_str())
    }

    #[must_use]
    pub fn expires_at(&self) -> Option<i64> {
        self.current.as_ref().map(|t| t.expires_at)
    }

    #[must_use]
    pub fn is_present(&self) -> bool {
        self.current.is_some()
    }

    /// True when a token is present and its expiry is at or before `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.current
            .as_ref()
            .is_some_and(|t| t.expires_at <= now)
    }
}

/// On-disk shape of the session state.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSession {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

impl From<&Session> for StoredSession {
    fn from(session: &Session) -> Self {
        Self {
            access_token: session.token().map(str::to_owned),
            expires_in: session.expires_at(),
        }
    }
}

impl StoredSession {
    /// `None` when exactly one of the two fields is present.
    fn into_session(self) -> Option<Session> {
        match (self.access_token, self.expires_in) {
            (Some(token), Some(expires_at)) => Some(Session::with_token(token, expires_at)),
            (None, None) => Some(Session::empty()),
            _ => None,
        }
    }
}

// =============================================================================
// SESSION STORE
// =============================================================================

#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    storage: LocalStorage,
    current: Mutex<Session>,
    changes: watch::Sender<Session>,
}

impl SessionStore {
    /// Open the store, rehydrating from `storage` when a session was persisted.
    ///
    /// Unreadable or inconsistent documents are logged and treated as empty.
    #[must_use]
    pub fn open(storage: LocalStorage) -> Self {
        let initial = rehydrate(&storage);
        let (changes, _) = watch::channel(initial.clone());
        Self { inner: Arc::new(SessionInner { storage, current: Mutex::new(initial), changes }) }
    }

    /// Current snapshot. Never fails and never waits on a pending write.
    #[must_use]
    pub fn read(&self) -> Session {
        self.inner.changes.borrow().clone()
    }

    /// Receiver notified after every successful commit or clear.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.inner.changes.subscribe()
    }

    /// Replace the session with `token`/`expires_at`.
    ///
    /// # Errors
    ///
    /// [`ClientError::Validation`] for an empty token,
    /// [`ClientError::Transport`] if the durable write fails. The in-memory
    /// session is unchanged on error.
    pub fn commit(&self, token: impl Into<String>, expires_at: i64) -> Result<(), ClientError> {
        let token = token.into();
        if token.is_empty() {
            return Err(ClientError::Validation("token must not be empty".into()));
        }
        let mut current = self.lock();
        self.replace(&mut current, Session::with_token(token, expires_at))?;
        tracing::debug!(expires_at, "session committed");
        Ok(())
    }

    /// Reset the session to empty.
    ///
    /// # Errors
    ///
    /// [`ClientError::Transport`] if the durable write fails; the in-memory
    /// session is unchanged on error.
    pub fn clear(&self) -> Result<(), ClientError> {
        let mut current = self.lock();
        self.replace(&mut current, Session::empty())?;
        tracing::debug!("session cleared");
        Ok(())
    }

    /// Clear only if the session still holds `token`. Returns whether it cleared.
    ///
    /// Used when a request made with `token` is rejected, so a newer login
    /// committed in the meantime is left alone.
    ///
    /// # Errors
    ///
    /// [`ClientError::Transport`] if the durable write fails.
    pub fn clear_if_current(&self, token: &str) -> Result<bool, ClientError> {
        let mut current = self.lock();
        if current.token() != Some(token) {
            return Ok(false);
        }
        self.replace(&mut current, Session::empty())?;
        tracing::debug!("stale session cleared");
        Ok(true)
    }

    fn replace(&self, current: &mut MutexGuard<'_, Session>, next: Session) -> Result<(), ClientError> {
        self.inner
            .storage
            .save_json(SESSION_STORAGE_KEY, &Persisted::new(StoredSession::from(&next)))?;
        **current = next.clone();
        self.inner.changes.send_replace(next);
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.inner
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

fn rehydrate(storage: &LocalStorage) -> Session {
    match storage.load_json::<Persisted<StoredSession>>(SESSION_STORAGE_KEY) {
        Ok(Some(persisted)) => persisted.state.into_session().unwrap_or_else(|| {
            tracing::warn!("persisted session has a token without expiry (or vice versa); starting empty");
            Session::empty()
        }),
        Ok(None) => Session::empty(),
        Err(e) => {
            tracing::warn!(error = %e, "failed to rehydrate session; starting empty");
            Session::empty()
        }
    }
}
