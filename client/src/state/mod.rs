//! Client state containers.
//!
//! DESIGN
//! ======
//! Stores here are explicitly owned handles created at startup, never
//! ambient globals.

pub mod auth;
