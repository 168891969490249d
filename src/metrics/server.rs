//! Metrics HTTP Server
//!
//! Minimal HTTP endpoint for Prometheus scraping. Kept on its own listener
//! so the visitor-facing route table stays untouched.

use crate::metrics::Metrics;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tracing::{debug, error, info};

/// HTTP server for serving Prometheus metrics
pub struct MetricsServer {
    metrics: Arc<Metrics>,
    bind_addr: SocketAddr,
}

impl MetricsServer {
    /// Create a new metrics server
    pub fn new(metrics: Arc<Metrics>, bind_addr: SocketAddr) -> Self {
        Self { metrics, bind_addr }
    }

    /// Start the metrics server
    pub async fn start(&self) -> anyhow::Result<()> {
        let listener = TcpListener::bind(self.bind_addr).await?;
        info!("Metrics listener on {}", self.bind_addr);

        loop {
            match listener.accept().await {
                Ok((mut stream, addr)) => {
                    debug!("metrics scrape from {}", addr);

                    let metrics = self.metrics.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handle_scrape(&mut stream, metrics).await {
                            error!("Metrics scrape from {} failed: {}", addr, e);
                        }
                    });
                }
                Err(e) => {
                    error!("Metrics listener accept failed: {}", e);
                }
            }
        }
    }
}

/// Answer a single request on the metrics listener
async fn handle_scrape(
    stream: &mut tokio::net::TcpStream,
    metrics: Arc<Metrics>,
) -> anyhow::Result<()> {
    let mut buffer = [0; 1024];
    let bytes_read = stream.read(&mut buffer).await?;

    if bytes_read == 0 {
        return Ok(());
    }

    let request = String::from_utf8_lossy(&buffer[..bytes_read]);

    let (status, content_type, body) = if request.starts_with("GET /metrics") {
        (
            "200 OK",
            "text/plain; version=0.0.4; charset=utf-8",
            metrics.export_prometheus(),
        )
    } else if request.starts_with("GET /health") {
        ("200 OK", "text/plain", "OK".to_string())
    } else {
        ("404 Not Found", "text/plain", "Not Found".to_string())
    };

    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        content_type,
        body.len(),
        body
    );
    stream.write_all(response.as_bytes()).await?;

    Ok(())
}
