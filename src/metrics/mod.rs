//! Metrics Module
//!
//! Counts site activity and exports it in Prometheus format on a separate
//! listener, away from the visitor-facing routes.

pub mod collector;
pub mod server;

pub use collector::Metrics;
pub use server::MetricsServer;
