//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own credential checking and token minting so route
//! handlers can stay focused on body parsing and status mapping.

pub mod credentials;
pub mod issuer;
pub mod token;
