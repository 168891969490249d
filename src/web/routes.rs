//! Route Table

use super::guards::{admin_guard, session_guard};
use super::handlers::{self, AppState};
use axum::handler::HandlerWithoutStateExt;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Build the full route table around the shared state
///
/// Unmatched paths fall through to the static file directory and from
/// there to the 404 page.
pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(handlers::landing))
        .route("/signup", get(handlers::signup_form))
        .route("/createUser", get(handlers::signup_form))
        .route("/submitUser", post(handlers::submit_user))
        .route(
            "/login",
            get(handlers::login_form).post(handlers::login_form),
        )
        .route("/loggingin", post(handlers::logging_in))
        .route("/tryagain", get(handlers::try_again))
        .route("/logout", get(handlers::logout))
        .route("/contact", get(handlers::contact))
        .route("/submitEmail", post(handlers::submit_email))
        .route("/nosql-injection", get(handlers::nosql_injection));

    let member_routes = Router::new()
        .route("/loggedIn", get(handlers::logged_in))
        .route("/members", get(handlers::members))
        .route_layer(middleware::from_fn_with_state(state.clone(), session_guard));

    // route_layer wraps bottom-up, so the session guard added last runs
    // first and the admin guard only ever sees authenticated requests.
    let admin_routes = Router::new()
        .route("/admin", get(handlers::admin_overview))
        .route("/promote/:id", post(handlers::promote))
        .route("/demote/:id", post(handlers::demote))
        .route_layer(middleware::from_fn_with_state(state.clone(), admin_guard))
        .route_layer(middleware::from_fn_with_state(state.clone(), session_guard));

    let static_files = ServeDir::new(&state.config.server.static_dir)
        .not_found_service(handlers::not_found.into_service());

    Router::new()
        .merge(public_routes)
        .merge(member_routes)
        .merge(admin_routes)
        .fallback_service(static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
