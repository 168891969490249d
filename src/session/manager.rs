//! Session Manager

use super::clock::Clock;
use super::store::SessionStore;
use super::types::{SessionRecord, SessionState, SESSION_TTL_SECS};
use crate::credentials::Role;
use crate::Result;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Issues, resolves, and destroys server-side sessions
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    clock: Arc<dyn Clock>,
}

impl SessionManager {
    pub fn new(store: Arc<dyn SessionStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Establish a session for a verified login
    ///
    /// Every call issues a fresh random id, so a cookie captured before
    /// login can never name the session created by it.
    pub fn establish(&self, identifier: String, role: Role) -> Result<SessionRecord> {
        let now = self.clock.now();
        let record = SessionRecord {
            session_id: Uuid::new_v4().to_string(),
            identifier,
            role,
            issued_at: now,
            expires_at: now + chrono::Duration::seconds(SESSION_TTL_SECS),
        };
        self.store.put(record.clone())?;
        debug!(
            "established session {} for '{}'",
            record.session_id, record.identifier
        );
        Ok(record)
    }

    /// Resolve a session id to its current state
    ///
    /// Expiry is enforced lazily: a record past its deadline is removed on
    /// first sight and reported as anonymous. There is no background sweep.
    pub fn resolve(&self, session_id: &str) -> Result<SessionState> {
        match self.store.get(session_id)? {
            None => Ok(SessionState::Anonymous),
            Some(record) if self.clock.now() > record.expires_at => {
                self.store.delete(session_id)?;
                debug!("session {} expired, removed on read", session_id);
                Ok(SessionState::Anonymous)
            }
            Some(record) => Ok(SessionState::Authenticated {
                identifier: record.identifier,
                role: record.role,
                expires_at: record.expires_at,
            }),
        }
    }

    /// Destroy a session, reporting whether one existed
    pub fn destroy(&self, session_id: &str) -> Result<bool> {
        let removed = self.store.delete(session_id)?;
        if removed {
            debug!("destroyed session {}", session_id);
        }
        Ok(removed)
    }
}
