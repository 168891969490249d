//! Session Lifecycle Integration Tests

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use chrono::{Duration, Utc};
use clubhouse::credentials::MemoryCredentialStore;
use clubhouse::metrics::Metrics;
use clubhouse::session::{
    ManualClock, MemorySessionStore, SessionCookie, SessionManager, SessionState,
    SESSION_TTL_SECS,
};
use clubhouse::web::{create_router, AppState};
use clubhouse::Config;
use std::sync::Arc;
use tower::ServiceExt;

/// Build a state whose clock the test can drive by hand
fn test_state_with_clock() -> (AppState, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let state = AppState {
        config: Arc::new(Config::default()),
        credentials: Arc::new(MemoryCredentialStore::new()),
        sessions: Arc::new(SessionManager::new(
            Arc::new(MemorySessionStore::new()),
            clock.clone(),
        )),
        cookie: Arc::new(SessionCookie::new("integration-signing-secret-0123456789")),
        metrics: Arc::new(Metrics::new()),
    };
    (state, clock)
}

fn get_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

fn form_post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn session_cookie(response: &Response) -> String {
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("expected a Set-Cookie header")
        .to_str()
        .unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

#[tokio::test]
async fn test_sessions_expire_one_hour_after_login() {
    let (state, clock) = test_state_with_clock();
    let app = create_router(state.clone());

    let response = app
        .clone()
        .oneshot(form_post("/submitUser", "name=alice&password=correct-horse"))
        .await
        .unwrap();
    let cookie = session_cookie(&response);

    // Still inside the hour
    clock.advance(Duration::seconds(SESSION_TTL_SECS - 1));
    let response = app
        .clone()
        .oneshot(get_with_cookie("/members", &cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // One second past the deadline
    clock.advance(Duration::seconds(2));
    let response = app
        .clone()
        .oneshot(get_with_cookie("/members", &cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/login");

    // The record was removed on that read, so winding the clock back
    // does not bring the session back
    clock.advance(Duration::hours(-2));
    let response = app
        .oneshot(get_with_cookie("/members", &cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_the_cookie_advertises_the_same_ttl() {
    let (state, _clock) = test_state_with_clock();
    let app = create_router(state);

    let response = app
        .oneshot(form_post("/submitUser", "name=alice&password=correct-horse"))
        .await
        .unwrap();

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(set_cookie.contains(&format!("Max-Age={}", SESSION_TTL_SECS)));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));
}

#[tokio::test]
async fn test_logout_destroys_the_session_server_side() {
    let (state, _clock) = test_state_with_clock();
    let app = create_router(state.clone());

    let response = app
        .clone()
        .oneshot(form_post("/submitUser", "name=alice&password=correct-horse"))
        .await
        .unwrap();
    let cookie = session_cookie(&response);

    let response = app
        .clone()
        .oneshot(get_with_cookie("/logout", &cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let clearing = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(clearing.contains("Max-Age=0"));

    // Replaying the old cookie is just an anonymous request now
    let response = app
        .oneshot(get_with_cookie("/members", &cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/login");
    assert_eq!(state.metrics.get_sessions_destroyed(), 1);
}

#[tokio::test]
async fn test_logout_without_a_session_is_harmless() {
    let (state, _clock) = test_state_with_clock();
    let app = create_router(state.clone());

    let response = app
        .oneshot(Request::builder().uri("/logout").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(state.metrics.get_sessions_destroyed(), 0);
}

#[tokio::test]
async fn test_forged_and_tampered_cookies_are_anonymous() {
    let (state, _clock) = test_state_with_clock();
    let app = create_router(state.clone());

    let response = app
        .clone()
        .oneshot(form_post("/submitUser", "name=alice&password=correct-horse"))
        .await
        .unwrap();
    let cookie = session_cookie(&response);

    // Flip part of the signed value
    let tampered = cookie.replacen("clubhouse_sid=", "clubhouse_sid=f", 1);
    let response = app
        .clone()
        .oneshot(get_with_cookie("/members", &tampered))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/login");

    // A value sealed under a different key names a real session id but
    // fails verification here
    let record = state
        .sessions
        .establish("alice".to_string(), clubhouse::credentials::Role::User)
        .unwrap();
    let foreign = SessionCookie::new("a-completely-different-signing-key-00");
    let forged = format!("clubhouse_sid={}", foreign.seal(&record.session_id));
    let response = app
        .oneshot(get_with_cookie("/members", &forged))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    // The session itself is untouched, only the cookie failed
    assert!(matches!(
        state.sessions.resolve(&record.session_id).unwrap(),
        SessionState::Authenticated { .. }
    ));
}

#[tokio::test]
async fn test_each_login_replaces_the_session_id() {
    let (state, _clock) = test_state_with_clock();
    let app = create_router(state);

    let response = app
        .clone()
        .oneshot(form_post("/submitUser", "name=alice&password=correct-horse"))
        .await
        .unwrap();
    let first = session_cookie(&response);

    let response = app
        .oneshot(form_post("/loggingin", "name=alice&password=correct-horse"))
        .await
        .unwrap();
    let second = session_cookie(&response);

    assert_ne!(first, second);
}
