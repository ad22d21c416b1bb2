//! Server configuration parsed from environment variables.
//!
//! DESIGN
//! ======
//! The mock login endpoint accepts exactly one credential pair. The pair, the
//! display name returned with it, and the token validity window are read here
//! so nothing downstream hard-codes them.

use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_LOGIN_EMAIL: &str = "academy@gmail.com";
pub const DEFAULT_LOGIN_PASSWORD: &str = "academy123";
pub const DEFAULT_LOGIN_NAME: &str = "Test User";
/// One year. Deliberately long for the mock issuer.
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 60 * 60 * 24 * 365;
pub const DEFAULT_LOGIN_DELAY_MS: u64 = 0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockAccount {
    pub email: String,
    pub password: String,
    pub name: String,
}

impl Default for MockAccount {
    fn default() -> Self {
        Self {
            email: DEFAULT_LOGIN_EMAIL.to_owned(),
            password: DEFAULT_LOGIN_PASSWORD.to_owned(),
            name: DEFAULT_LOGIN_NAME.to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub account: MockAccount,
    pub token_ttl: Duration,
    /// Artificial latency applied to every login attempt.
    pub login_delay: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            account: MockAccount::default(),
            token_ttl: Duration::from_secs(DEFAULT_TOKEN_TTL_SECS),
            login_delay: Duration::from_millis(DEFAULT_LOGIN_DELAY_MS),
        }
    }
}

impl ServerConfig {
    /// Build typed server config from environment variables.
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `MOCK_LOGIN_EMAIL` / `MOCK_LOGIN_PASSWORD`: the single accepted pair
    /// - `MOCK_LOGIN_NAME`: display name returned on success
    /// - `TOKEN_TTL_SECS`: default 31536000
    /// - `LOGIN_DELAY_MS`: default 0
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but cannot be parsed, or if
    /// the configured credential pair has an empty field.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Same as [`ServerConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = parse_var(&lookup, "PORT", DEFAULT_PORT)?;
        let account = MockAccount {
            email: lookup("MOCK_LOGIN_EMAIL").unwrap_or_else(|| DEFAULT_LOGIN_EMAIL.to_owned()),
            password: lookup("MOCK_LOGIN_PASSWORD").unwrap_or_else(|| DEFAULT_LOGIN_PASSWORD.to_owned()),
            name: lookup("MOCK_LOGIN_NAME").unwrap_or_else(|| DEFAULT_LOGIN_NAME.to_owned()),
        };
        if account.email.is_empty() || account.password.is_empty() {
            return Err(ConfigError::EmptyAccount);
        }
        let token_ttl = Duration::from_secs(parse_var(&lookup, "TOKEN_TTL_SECS", DEFAULT_TOKEN_TTL_SECS)?);
        let login_delay = Duration::from_millis(parse_var(&lookup, "LOGIN_DELAY_MS", DEFAULT_LOGIN_DELAY_MS)?);

        Ok(Self { port, account, token_ttl, login_delay })
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: String, value: String },
    #[error("MOCK_LOGIN_EMAIL and MOCK_LOGIN_PASSWORD must not be empty")]
    EmptyAccount,
}

pub(crate) fn parse_var<T>(lookup: impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { key: key.to_owned(), value: raw }),
        None => Ok(default),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
