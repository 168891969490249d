//! Request Handlers

use super::forms::{ContactQuery, EmailForm, LoginForm, SignupForm};
use super::guards::{current_session, session_cookie_id};
use super::views;
use crate::config::Config;
use crate::credentials::{valid_identifier, CredentialStore, Role, User};
use crate::error::AppError;
use crate::metrics::Metrics;
use crate::password;
use crate::session::{SessionCookie, SessionManager, SessionRecord, SessionState};
use axum::extract::{Form, Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{AppendHeaders, Html, IntoResponse, Redirect, Response};
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Shared application state for handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub credentials: Arc<dyn CredentialStore>,
    pub sessions: Arc<SessionManager>,
    pub cookie: Arc<SessionCookie>,
    pub metrics: Arc<Metrics>,
}

/// Redirect while attaching the session cookie for a fresh record
fn redirect_with_session(state: &AppState, record: &SessionRecord, to: &'static str) -> Response {
    (
        AppendHeaders([(
            header::SET_COOKIE,
            state.cookie.set_header(&record.session_id),
        )]),
        Redirect::to(to),
    )
        .into_response()
}

/// Landing page
pub async fn landing() -> Html<String> {
    views::landing()
}

/// Account creation form
pub async fn signup_form() -> Html<String> {
    views::signup_form()
}

/// Create an account and log it straight in
pub async fn submit_user(
    State(state): State<AppState>,
    Form(form): Form<SignupForm>,
) -> Result<Response, AppError> {
    let creds = form.validate()?;

    let digest = password::hash_password(&creds.password)?;
    state
        .credentials
        .create(User::new(creds.identifier.clone(), digest))?;

    let record = state
        .sessions
        .establish(creds.identifier.clone(), Role::User)?;
    state.metrics.record_signup();
    info!("account created: '{}'", creds.identifier);

    Ok(redirect_with_session(&state, &record, "/members"))
}

/// Login form
pub async fn login_form() -> Html<String> {
    views::login_form()
}

/// Verify a login attempt
///
/// All failure causes produce the identical redirect. Which cause it was
/// only ever reaches the debug log.
pub async fn logging_in(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let Some(creds) = form.normalized() else {
        debug!("login rejected: malformed submission");
        state.metrics.record_login_failure();
        return Ok(Redirect::to("/tryagain").into_response());
    };

    match state.credentials.find_by_identifier(&creds.identifier)? {
        Some(user) => {
            if password::verify_password(&user.password_digest, &creds.password) {
                let record = state
                    .sessions
                    .establish(user.identifier.clone(), user.role)?;
                state.metrics.record_login();
                info!("login: '{}'", user.identifier);
                return Ok(redirect_with_session(&state, &record, "/loggedIn"));
            }
            debug!("login rejected for '{}': wrong password", creds.identifier);
        }
        None => {
            debug!("login rejected for '{}': no such account", creds.identifier);
        }
    }

    state.metrics.record_login_failure();
    Ok(Redirect::to("/tryagain").into_response())
}

/// Generic failed-login page
pub async fn try_again() -> Html<String> {
    views::try_again()
}

/// Post-login confirmation page
pub async fn logged_in() -> Html<String> {
    views::logged_in()
}

/// Members page
pub async fn members(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Html<String>, AppError> {
    let session = current_session(&state, &headers)?;
    let SessionState::Authenticated { identifier, .. } = session else {
        return Err(AppError::Unauthorized);
    };

    let image = views::MEMBER_IMAGES[rand::thread_rng().gen_range(0..views::MEMBER_IMAGES.len())];
    Ok(views::members(&identifier, image))
}

/// End the session and clear the cookie
///
/// Safe for anonymous visitors too; they just get the logged-out page.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    if let Some(session_id) = session_cookie_id(&state, &headers) {
        if state.sessions.destroy(&session_id)? {
            state.metrics.record_session_destroyed();
            info!("logout: session {}", session_id);
        }
    }

    Ok((
        AppendHeaders([(header::SET_COOKIE, state.cookie.clear_header())]),
        views::signed_out(),
    )
        .into_response())
}

/// Admin overview of every account
pub async fn admin_overview(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let users = state.credentials.list_all()?;
    Ok(views::admin(&users))
}

/// Grant the admin role to an account
pub async fn promote(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> Result<Response, AppError> {
    if !valid_identifier(&identifier) {
        return Err(AppError::NotFound(identifier));
    }
    state.credentials.set_role(&identifier, Role::Admin)?;
    info!("promoted '{}' to admin", identifier);
    Ok(Redirect::to("/admin").into_response())
}

/// Return an account to the plain user role
pub async fn demote(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> Result<Response, AppError> {
    if !valid_identifier(&identifier) {
        return Err(AppError::NotFound(identifier));
    }
    state.credentials.set_role(&identifier, Role::User)?;
    info!("demoted '{}' to user", identifier);
    Ok(Redirect::to("/admin").into_response())
}

/// Contact form
pub async fn contact(Query(query): Query<ContactQuery>) -> Html<String> {
    views::contact(query.missing.is_some())
}

/// Accept a contact email, bouncing empty submissions back with a hint
pub async fn submit_email(Form(form): Form<EmailForm>) -> Response {
    match form.email {
        Some(email) if !email.is_empty() => views::email_submitted(&email).into_response(),
        _ => Redirect::to("/contact?missing=1").into_response(),
    }
}

/// Injection demonstration route
///
/// Shows what boundary validation buys: operator-style keys and values
/// that fail the identifier rules are called out instead of reaching the
/// store.
pub async fn nosql_injection(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Html<String>, AppError> {
    if params.keys().any(|key| key.starts_with("user[")) {
        debug!("injection probe: operator-style key in query");
        return Ok(views::injection_blocked());
    }

    let Some(identifier) = params.get("user") else {
        return Ok(views::injection_usage());
    };

    if !valid_identifier(identifier) {
        debug!("injection probe: value failed identifier rules");
        return Ok(views::injection_blocked());
    }

    let found = state.credentials.find_by_identifier(identifier)?;
    debug!(
        "injection probe: lookup for '{}', found: {}",
        identifier,
        found.is_some()
    );
    Ok(views::injection_greeting(identifier))
}

/// Catch-all for unmatched paths
pub async fn not_found() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, views::not_found())
}
