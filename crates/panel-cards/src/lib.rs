//! # panel-cards
//!
//! Card management for the server panel: validation, name uniqueness,
//! display ordering and summary statistics on top of a
//! [`panel_storage::Storage`] handle.

#![warn(clippy::all)]

pub mod errors;
mod service;
pub mod types;
pub mod validation;

pub use errors::{CardError, Result};
pub use panel_storage::Card;
pub use service::CardService;
pub use types::*;
