pub mod auth;
pub mod cards;
pub mod docs;
pub mod health;
pub mod helpers;
pub mod icons;
pub mod utils;
