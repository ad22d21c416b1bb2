//! Client configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::path::PathBuf;
use std::time::Duration;

use crate::util::auth::ExpiryPolicy;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const STORAGE_SUBDIR: &str = "userdesk";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub storage_dir: PathBuf,
    pub expiry_policy: ExpiryPolicy,
    pub request_timeout: Duration,
}

impl ClientConfig {
    /// Build client config from environment variables.
    ///
    /// - `USERDESK_BASE_URL`: default `http://127.0.0.1:3000`
    /// - `USERDESK_STORAGE_DIR`: default `<local data dir>/userdesk`
    /// - `USERDESK_ENFORCE_EXPIRY`: boolean, default false
    /// - `USERDESK_REQUEST_TIMEOUT_SECS`: default 30
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary variable source. Unparsable values
    /// fall back to their defaults.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = lookup("USERDESK_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
        let storage_dir = lookup("USERDESK_STORAGE_DIR")
            .filter(|s| !s.trim().is_empty())
            .map_or_else(default_storage_dir, PathBuf::from);
        let expiry_policy = if lookup("USERDESK_ENFORCE_EXPIRY")
            .as_deref()
            .and_then(parse_bool)
            .unwrap_or(false)
        {
            ExpiryPolicy::Enforce
        } else {
            ExpiryPolicy::Ignore
        };
        let request_timeout = Duration::from_secs(
            lookup("USERDESK_REQUEST_TIMEOUT_SECS")
                .and_then(|v| v.trim().parse::<u64>().ok())
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        );

        Self { base_url, storage_dir, expiry_policy, request_timeout }
    }
}

pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn default_storage_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(STORAGE_SUBDIR)
}
