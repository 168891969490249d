//! Metrics Collector

use prometheus::{Counter, Gauge, Registry, TextEncoder};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, error};

/// Collects and exports site activity metrics
pub struct Metrics {
    prometheus_registry: Registry,

    // Prometheus metrics
    signups_total: Counter,
    logins_total: Counter,
    login_failures_total: Counter,
    denied_requests_total: Counter,
    sessions_destroyed_total: Counter,
    active_sessions: Gauge,

    // Internal counters
    signups: AtomicU64,
    logins: AtomicU64,
    login_failures: AtomicU64,
    denied_requests: AtomicU64,
    sessions_destroyed: AtomicU64,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        let prometheus_registry = Registry::new();

        let signups_total = Counter::new("clubhouse_signups_total", "Total accounts created")
            .expect("Failed to create signups_total counter");

        let logins_total = Counter::new("clubhouse_logins_total", "Total successful logins")
            .expect("Failed to create logins_total counter");

        let login_failures_total = Counter::new(
            "clubhouse_login_failures_total",
            "Total rejected login attempts",
        )
        .expect("Failed to create login_failures_total counter");

        let denied_requests_total = Counter::new(
            "clubhouse_denied_requests_total",
            "Total requests turned away by a route guard",
        )
        .expect("Failed to create denied_requests_total counter");

        let sessions_destroyed_total = Counter::new(
            "clubhouse_sessions_destroyed_total",
            "Total sessions ended by logout",
        )
        .expect("Failed to create sessions_destroyed_total counter");

        let active_sessions = Gauge::new(
            "clubhouse_active_sessions",
            "Sessions established minus sessions ended",
        )
        .expect("Failed to create active_sessions gauge");

        prometheus_registry
            .register(Box::new(signups_total.clone()))
            .expect("Failed to register signups_total");
        prometheus_registry
            .register(Box::new(logins_total.clone()))
            .expect("Failed to register logins_total");
        prometheus_registry
            .register(Box::new(login_failures_total.clone()))
            .expect("Failed to register login_failures_total");
        prometheus_registry
            .register(Box::new(denied_requests_total.clone()))
            .expect("Failed to register denied_requests_total");
        prometheus_registry
            .register(Box::new(sessions_destroyed_total.clone()))
            .expect("Failed to register sessions_destroyed_total");
        prometheus_registry
            .register(Box::new(active_sessions.clone()))
            .expect("Failed to register active_sessions");

        Self {
            prometheus_registry,
            signups_total,
            logins_total,
            login_failures_total,
            denied_requests_total,
            sessions_destroyed_total,
            active_sessions,
            signups: AtomicU64::new(0),
            logins: AtomicU64::new(0),
            login_failures: AtomicU64::new(0),
            denied_requests: AtomicU64::new(0),
            sessions_destroyed: AtomicU64::new(0),
        }
    }

    /// Record a created account
    pub fn record_signup(&self) {
        self.signups_total.inc();
        self.signups.fetch_add(1, Ordering::Relaxed);
        self.active_sessions.inc();
        debug!("recorded signup");
    }

    /// Record a successful login
    pub fn record_login(&self) {
        self.logins_total.inc();
        self.logins.fetch_add(1, Ordering::Relaxed);
        self.active_sessions.inc();
        debug!("recorded login");
    }

    /// Record a rejected login attempt
    pub fn record_login_failure(&self) {
        self.login_failures_total.inc();
        self.login_failures.fetch_add(1, Ordering::Relaxed);
        debug!("recorded login failure");
    }

    /// Record a request turned away by a route guard
    pub fn record_denied_request(&self) {
        self.denied_requests_total.inc();
        self.denied_requests.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a session ended by logout
    pub fn record_session_destroyed(&self) {
        self.sessions_destroyed_total.inc();
        self.sessions_destroyed.fetch_add(1, Ordering::Relaxed);
        self.active_sessions.dec();
    }

    /// Get total accounts created
    pub fn get_signups(&self) -> u64 {
        self.signups.load(Ordering::Relaxed)
    }

    /// Get total successful logins
    pub fn get_logins(&self) -> u64 {
        self.logins.load(Ordering::Relaxed)
    }

    /// Get total rejected login attempts
    pub fn get_login_failures(&self) -> u64 {
        self.login_failures.load(Ordering::Relaxed)
    }

    /// Get total guard denials
    pub fn get_denied_requests(&self) -> u64 {
        self.denied_requests.load(Ordering::Relaxed)
    }

    /// Get total sessions ended by logout
    pub fn get_sessions_destroyed(&self) -> u64 {
        self.sessions_destroyed.load(Ordering::Relaxed)
    }

    /// Export metrics in Prometheus format
    pub fn export_prometheus(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.prometheus_registry.gather();

        match encoder.encode_to_string(&metric_families) {
            Ok(output) => output,
            Err(e) => {
                error!(error = %e, "Failed to encode Prometheus metrics");
                String::new()
            }
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_start_at_zero() {
        let metrics = Metrics::new();
        assert_eq!(metrics.get_signups(), 0);
        assert_eq!(metrics.get_logins(), 0);
        assert_eq!(metrics.get_login_failures(), 0);
        assert_eq!(metrics.get_denied_requests(), 0);
    }

    #[test]
    fn recording_moves_the_counters() {
        let metrics = Metrics::new();
        metrics.record_signup();
        metrics.record_login();
        metrics.record_login();
        metrics.record_login_failure();
        metrics.record_denied_request();
        metrics.record_session_destroyed();

        assert_eq!(metrics.get_signups(), 1);
        assert_eq!(metrics.get_logins(), 2);
        assert_eq!(metrics.get_login_failures(), 1);
        assert_eq!(metrics.get_denied_requests(), 1);
        assert_eq!(metrics.get_sessions_destroyed(), 1);
    }

    #[test]
    fn export_speaks_prometheus() {
        let metrics = Metrics::new();
        metrics.record_signup();

        let output = metrics.export_prometheus();
        assert!(output.contains("clubhouse_signups_total"));
        assert!(output.contains("clubhouse_active_sessions"));
    }
}
