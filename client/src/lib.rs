//! Client-side auth core for the userdesk admin console.
//!
//! SYSTEM CONTEXT
//! ==============
//! A login surface calls the mock token endpoint through [`net::api`] and
//! commits the result into [`state::auth::SessionStore`]. Screens consult
//! [`util::auth::RouteGuard`] before rendering. [`app::ClientApp`] wires these
//! together around one storage directory.

pub mod app;
pub mod config;
pub mod error;
pub mod net;
pub mod state;
pub mod util;

pub use app::ClientApp;
pub use config::ClientConfig;
pub use error::ClientError;
