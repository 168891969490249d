//! Route Guards

use super::handlers::AppState;
use crate::error::AppError;
use crate::policy;
use crate::session::{SessionState, SESSION_COOKIE};
use axum::extract::{Request, State};
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::Response;
use tracing::debug;

/// Pull the raw session cookie value out of the request headers
fn session_cookie_value(headers: &HeaderMap) -> Option<&str> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').map(str::trim).find_map(|pair| {
        let (name, value) = pair.split_once('=')?;
        (name == SESSION_COOKIE).then_some(value)
    })
}

/// Recover the session id named by the request, if its cookie verifies
pub(crate) fn session_cookie_id(state: &AppState, headers: &HeaderMap) -> Option<String> {
    let raw = session_cookie_value(headers)?;
    let opened = state.cookie.open(raw);
    if opened.is_none() {
        debug!("session cookie failed signature verification");
    }
    opened
}

/// Resolve the request's cookie to a session state
///
/// No cookie, a forged cookie, and an expired or destroyed session all
/// come out as anonymous.
pub fn current_session(state: &AppState, headers: &HeaderMap) -> Result<SessionState, AppError> {
    match session_cookie_id(state, headers) {
        Some(session_id) => Ok(state.sessions.resolve(&session_id)?),
        None => Ok(SessionState::Anonymous),
    }
}

/// Keep anonymous visitors out of member routes
pub async fn session_guard(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let session = current_session(&state, request.headers())?;
    if policy::is_authenticated(&session) {
        Ok(next.run(request).await)
    } else {
        state.metrics.record_denied_request();
        Err(AppError::Unauthorized)
    }
}

/// Keep non-admin sessions out of the admin surface
///
/// Runs behind the session guard, so by the time this rejects someone
/// they are logged in and get a page, not a login redirect.
pub async fn admin_guard(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let session = current_session(&state, request.headers())?;
    if policy::is_admin(&session) {
        Ok(next.run(request).await)
    } else {
        state.metrics.record_denied_request();
        Err(AppError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn cookie_value_is_found_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; clubhouse_sid=abc.def; lang=en"),
        );
        assert_eq!(session_cookie_value(&headers), Some("abc.def"));
    }

    #[test]
    fn absent_cookie_is_none() {
        let headers = HeaderMap::new();
        assert_eq!(session_cookie_value(&headers), None);

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark"));
        assert_eq!(session_cookie_value(&headers), None);
    }
}
