//! # panel-policy
//!
//! Brute-force protection for the admin login: failed attempts are counted
//! per client and a client that reaches the threshold is locked out until
//! the window since its last failure has passed.

#![warn(clippy::all)]

pub mod lockout;
pub mod types;

pub use lockout::LockoutPolicy;
pub use types::*;
