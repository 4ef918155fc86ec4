//! API endpoint handlers, one module per dashboard area.

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod ml;
pub mod monitoring;
pub mod notifications;
pub mod transplants;
