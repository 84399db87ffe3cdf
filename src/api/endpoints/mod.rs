//! API endpoint handlers.

pub mod extract;
pub mod health;
