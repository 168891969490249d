//! Session Layer
//!
//! Server-side sessions: established on login, resolved on every request,
//! destroyed on logout. The browser only ever holds a signed reference to
//! the record, never the record itself.

pub mod clock;
pub mod cookie;
pub mod manager;
pub mod store;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use cookie::{SessionCookie, SESSION_COOKIE};
pub use manager::SessionManager;
pub use store::{FileSessionStore, MemorySessionStore, SessionStore};
pub use types::{SessionRecord, SessionState, SESSION_TTL_SECS};
