//! Access Policy
//!
//! Pure decisions over a resolved session state. Route guards ask these
//! questions instead of inspecting the state themselves.

use crate::credentials::Role;
use crate::session::SessionState;

/// Whether the session may reach member-only pages
pub fn is_authenticated(state: &SessionState) -> bool {
    matches!(state, SessionState::Authenticated { .. })
}

/// Whether the session may reach the admin surface
///
/// Composed on top of `is_authenticated`, so admin access always implies
/// a live authenticated session.
pub fn is_admin(state: &SessionState) -> bool {
    is_authenticated(state)
        && matches!(
            state,
            SessionState::Authenticated {
                role: Role::Admin,
                ..
            }
        )
}
