//! HTTP route handlers.

pub mod authors;
pub mod health;
pub mod metrics;
