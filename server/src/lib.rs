//! Mock authentication API for the userdesk admin console.
//!
//! SYSTEM CONTEXT
//! ==============
//! Exposes `POST /api/login`, which validates one configured credential pair
//! and returns an opaque bearer token with an absolute expiry. Everything
//! else in the console (user records, dashboards) lives elsewhere.

pub mod config;
pub mod routes;
pub mod services;
pub mod state;
