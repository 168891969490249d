//! Web Server

use super::handlers::AppState;
use super::routes;
use crate::shutdown;
use crate::Result;
use anyhow::Context;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;

/// Visitor-facing HTTP server
pub struct WebServer {
    bind_addr: SocketAddr,
    state: AppState,
}

impl WebServer {
    /// Create a new web server
    pub fn new(bind_addr: SocketAddr, state: AppState) -> Self {
        Self { bind_addr, state }
    }

    /// Serve requests until a shutdown signal arrives
    pub async fn start(self) -> Result<()> {
        let app = routes::create_router(self.state);

        let listener = TcpListener::bind(self.bind_addr)
            .await
            .with_context(|| format!("Failed to bind web server to {}", self.bind_addr))?;

        info!("Web server listening on {}", self.bind_addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown::shutdown_signal())
            .await
            .context("Web server error")?;

        Ok(())
    }
}
