//! Utility helpers shared across client modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate storage and navigation concerns from the stores
//! and surfaces that use them.

pub mod auth;
pub mod dark_mode;
pub mod storage;
