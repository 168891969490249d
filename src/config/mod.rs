//! Configuration Module
//!
//! Handles configuration loading and validation. Configuration is read
//! once at startup and immutable from then on.

pub mod manager;
pub mod types;

pub use manager::{ConfigManager, MIN_SECRET_LEN};
pub use types::*;
