//! Opaque bearer-token minting.
//!
//! TRADE-OFFS
//! ==========
//! Tokens carry no claims. The mock issuer only promises uniqueness, so a
//! random 32-byte value is enough and nothing needs to be verified later.

use std::fmt::Write;

use rand::Rng;

pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Generate a cryptographically random 32-byte hex token.
#[must_use]
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    bytes_to_hex(&bytes)
}

/// Produces access-token values for the issuer.
pub trait TokenMinter: Send + Sync {
    fn mint(&self) -> String;
}

/// Default minter: 64 lowercase hex characters from the thread RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomHexMinter;

impl TokenMinter for RandomHexMinter {
    fn mint(&self) -> String {
        generate_token()
    }
}

#[cfg(test)]
#[path = "token_test.rs"]
mod tests;
