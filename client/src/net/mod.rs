//! Networking modules for the HTTP API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` issues login and authorized calls, and `types` defines the login
//! wire schema.

pub mod api;
pub mod types;
