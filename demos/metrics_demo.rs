//! Metrics System Demo
//!
//! Demonstrates the activity counters and the Prometheus listener

use clubhouse::metrics::{Metrics, MetricsServer};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let metrics = Arc::new(Metrics::new());

    // Start the Prometheus listener in the background
    let server = MetricsServer::new(metrics.clone(), "127.0.0.1:9090".parse()?);
    tokio::spawn(async move {
        if let Err(e) = server.start().await {
            eprintln!("Metrics server error: {}", e);
        }
    });

    println!("Prometheus metrics available at http://127.0.0.1:9090/metrics");

    // Simulate some site activity
    simulate_activity(&metrics).await;

    // Show the counters
    println!("\nCounters:");
    println!("  Signups: {}", metrics.get_signups());
    println!("  Logins: {}", metrics.get_logins());
    println!("  Login failures: {}", metrics.get_login_failures());
    println!("  Denied requests: {}", metrics.get_denied_requests());
    println!("  Sessions destroyed: {}", metrics.get_sessions_destroyed());

    println!("\nPrometheus exposition:");
    println!("{}", metrics.export_prometheus());

    // Keep running for a bit to allow metrics scraping
    println!("Keeping server running for 30 seconds...");
    sleep(Duration::from_secs(30)).await;

    println!("Demo finished");
    Ok(())
}

async fn simulate_activity(metrics: &Metrics) {
    println!("Simulating site activity...");

    for i in 0..10 {
        metrics.record_signup();
        metrics.record_login();

        if i % 3 == 0 {
            metrics.record_login_failure();
        }
        if i % 4 == 0 {
            metrics.record_denied_request();
        }
        if i % 5 == 0 {
            metrics.record_session_destroyed();
        }

        sleep(Duration::from_millis(50)).await;
    }

    println!("Simulated {} visitor journeys", 10);
}
