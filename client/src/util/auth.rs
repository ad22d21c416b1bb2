//! Route guard.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every protected screen applies the same render-vs-redirect rule, derived
//! from the session snapshot at the moment of evaluation.
//!
//! TRADE-OFFS
//! ==========
//! Under the default [`ExpiryPolicy::Ignore`] a present token is enough to be
//! authorized even when its expiry has passed; the server-side 401 path is
//! what eventually clears such a session. [`ExpiryPolicy::Enforce`] closes
//! that gap without mutating the store.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::state::auth::{Session, SessionStore};

pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";
pub const ROOT_PATH: &str = "/";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardState {
    Authorized,
    Unauthorized,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExpiryPolicy {
    /// Token presence alone authorizes.
    #[default]
    Ignore,
    /// A token at or past its expiry does not authorize.
    Enforce,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Navigation {
    Render(Route),
    Redirect(&'static str),
    NotFound,
}

/// Derive the guard state from a session snapshot.
#[must_use]
pub fn evaluate(session: &Session, policy: ExpiryPolicy, now: i64) -> GuardState {
    if !session.is_present() {
        return GuardState::Unauthorized;
    }
    match policy {
        ExpiryPolicy::Enforce if session.is_expired_at(now) => GuardState::Unauthorized,
        ExpiryPolicy::Ignore | ExpiryPolicy::Enforce => GuardState::Authorized,
    }
}

#[must_use]
pub fn should_redirect_unauth(state: GuardState) -> bool {
    state == GuardState::Unauthorized
}

/// Map a path to what the surface should do for the given guard state.
#[must_use]
pub fn resolve(path: &str, state: GuardState) -> Navigation {
    let authorized = state == GuardState::Authorized;
    match normalize_path(path) {
        LOGIN_PATH => Navigation::Render(Route::Login),
        DASHBOARD_PATH if authorized => Navigation::Render(Route::Dashboard),
        DASHBOARD_PATH => Navigation::Redirect(LOGIN_PATH),
        ROOT_PATH if authorized => Navigation::Redirect(DASHBOARD_PATH),
        ROOT_PATH => Navigation::Redirect(LOGIN_PATH),
        _ => Navigation::NotFound,
    }
}

/// Strip query/fragment and any trailing slash (except for the root).
pub(crate) fn normalize_path(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let path = &path[..end];
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { ROOT_PATH } else { trimmed }
}

#[must_use]
pub fn now_epoch_secs() -> i64 {
    time::OffsetDateTime::now_utc().unix_timestamp()
}

/// Guard bound to a session store.
#[derive(Clone)]
pub struct RouteGuard {
    session: SessionStore,
    policy: ExpiryPolicy,
}

impl RouteGuard {
    #[must_use]
    pub fn new(session: SessionStore, policy: ExpiryPolicy) -> Self {
        Self { session, policy }
    }

    #[must_use]
    pub fn policy(&self) -> ExpiryPolicy {
        self.policy
    }

    #[must_use]
    pub fn state(&self) -> GuardState {
        self.state_at(now_epoch_secs())
    }

    #[must_use]
    pub fn state_at(&self, now: i64) -> GuardState {
        evaluate(&self.session.read(), self.policy, now)
    }

    #[must_use]
    pub fn resolve(&self, path: &str) -> Navigation {
        resolve(path, self.state())
    }
}
