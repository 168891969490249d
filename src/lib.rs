//! Clubhouse Library
//!
//! A members-only site: account signup with argon2 digests, signed
//! session cookies backed by server-side records, and an admin surface
//! for promoting and demoting accounts.

pub mod config;
pub mod credentials;
pub mod error;
pub mod metrics;
pub mod password;
pub mod policy;
pub mod session;
pub mod shutdown;
pub mod web;

pub use config::Config;
pub use error::AppError;
pub use web::{AppState, WebServer};

/// Common error type for the site
pub type Result<T> = anyhow::Result<T>;
