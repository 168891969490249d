//! Session Types

use crate::credentials::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How long an established session stays valid
pub const SESSION_TTL_SECS: i64 = 60 * 60;

/// A server-side session record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_id: String,
    pub identifier: String,
    /// Role snapshot taken at login. Role edits made afterwards apply
    /// from the next login, not to sessions already in flight.
    pub role: Role,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// What a request's cookie resolves to
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// No cookie, an unverifiable cookie, or an expired/destroyed session
    Anonymous,
    /// A live session
    Authenticated {
        identifier: String,
        role: Role,
        expires_at: DateTime<Utc>,
    },
}
