//! # panel-auth
//!
//! Admin authentication for the server panel. A single configured password
//! gates all write operations; failed attempts run through the lockout
//! policy and successful logins receive an opaque session token.

pub mod errors;
mod service;
pub mod types;

pub use errors::*;
pub use panel_policy::{LockoutConfig, LockoutStatus};
pub use service::{generate_random_bytes, sha256, AuthService};
pub use types::*;
