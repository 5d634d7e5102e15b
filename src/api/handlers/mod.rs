//! HTTP request handlers for API endpoints.

pub mod health;
pub mod stats;

pub use health::health_handler;
pub use stats::stats_handler;
