//! Web Layer
//!
//! The HTTP surface of the site: route table, guards, handlers, forms,
//! and page rendering.

pub mod forms;
pub mod guards;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod views;

pub use handlers::AppState;
pub use routes::create_router;
pub use server::WebServer;
