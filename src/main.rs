//! Clubhouse - Members-Only Demo Site
//!
//! A small account-and-sessions website built with Rust: argon2 password
//! digests, signed session cookies backed by server-side records, and an
//! admin surface for promoting and demoting accounts.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clubhouse::{
    config::ConfigManager,
    credentials::{CredentialStore, FileCredentialStore, Role, User},
    metrics::{Metrics, MetricsServer},
    password,
    session::{FileSessionStore, SessionCookie, SessionManager, SystemClock},
    web::{AppState, WebServer},
    Config,
};

/// CLI arguments for Clubhouse
#[derive(Parser, Debug)]
#[command(name = "clubhouse")]
#[command(about = "Clubhouse - Members-Only Demo Site")]
#[command(version)]
#[command(long_about = "
Clubhouse - Members-Only Demo Site

A small account-and-sessions website: signup, login, a members area, and
an admin page for managing account roles.

Configuration priority (highest to lowest):
1. Command-line arguments
2. Configuration file
3. Environment variables
4. Built-in defaults

Secrets are the exception: CLUBHOUSE_SIGNING_SECRET and
CLUBHOUSE_ENCRYPTION_SECRET always win over config file values, so the
secret material never has to live on disk.

Environment variables:
  CLUBHOUSE_BIND_ADDR              - Bind address (e.g., 127.0.0.1:3000)
  CLUBHOUSE_STATIC_DIR             - Directory served for static assets
  CLUBHOUSE_DATA_DIR               - Directory for account and session documents
  CLUBHOUSE_SIGNING_SECRET         - Session cookie signing secret (32+ chars)
  CLUBHOUSE_ENCRYPTION_SECRET      - Session document encryption secret (32+ chars)
  CLUBHOUSE_INITIAL_ADMIN          - Identifier of the bootstrap admin account
  CLUBHOUSE_INITIAL_ADMIN_PASSWORD - Password for the bootstrap admin account
  CLUBHOUSE_METRICS_ADDR           - Bind address for the Prometheus listener
  CLUBHOUSE_LOG_LEVEL              - Log level (trace, debug, info, warn, error)
")]
pub struct CliArgs {
    /// Configuration file path
    #[arg(
        short,
        long,
        default_value = "config.toml",
        help = "Path to configuration file"
    )]
    pub config: PathBuf,

    /// Bind address (overrides config file)
    #[arg(short, long, help = "Bind address (e.g., 127.0.0.1:3000)")]
    pub bind: Option<String>,

    /// Port to bind to (overrides config file)
    #[arg(short, long, help = "Port to bind to")]
    pub port: Option<u16>,

    /// Data directory (overrides config file)
    #[arg(long, help = "Directory for account and session documents")]
    pub data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", help = "Log level")]
    pub log_level: String,

    /// Enable verbose logging (sets log level to debug)
    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,

    /// Validate configuration and exit
    #[arg(long, help = "Validate configuration and exit")]
    pub validate_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();

    // Initialize tracing
    init_tracing(&args)?;

    info!(
        "Starting Clubhouse v{} - Members-Only Demo Site",
        env!("CARGO_PKG_VERSION")
    );

    // Load configuration with priority: CLI args > config file > environment > defaults
    let mut config = ConfigManager::load_from_file(&args.config)?;

    // Apply CLI argument overrides (highest priority)
    config.merge_with_cli_args(args.bind.as_deref(), args.port, args.data_dir.clone());

    // Final validation after all overrides
    config
        .validate()
        .context("Final configuration validation failed")?;

    // If validate-config flag is set, just validate and exit
    if args.validate_config {
        info!("✅ Configuration is valid");
        info!("Configuration summary:");
        info!("  Bind address: {}", config.server.bind_addr);
        info!("  Static directory: {}", config.server.static_dir.display());
        info!("  Data directory: {}", config.database.data_dir.display());
        info!(
            "  Bootstrap admin: {}",
            config
                .auth
                .initial_admin
                .as_deref()
                .unwrap_or("not configured")
        );
        info!(
            "  Metrics listener: {}",
            match config.monitoring.metrics_addr {
                Some(addr) => addr.to_string(),
                None => "disabled".to_string(),
            }
        );
        return Ok(());
    }

    info!("Configuration loaded successfully");
    info!("Bind address: {}", config.server.bind_addr);
    info!("Data directory: {}", config.database.data_dir.display());

    // Open the document stores
    let credentials: Arc<dyn CredentialStore> = Arc::new(
        FileCredentialStore::open(&config.database.data_dir)
            .context("Failed to open the account document")?,
    );
    let session_store = Arc::new(
        FileSessionStore::open(&config.database.data_dir, &config.session.encryption_secret)
            .context("Failed to open the session document")?,
    );

    bootstrap_admin(&config, credentials.as_ref())?;

    let metrics = Arc::new(Metrics::new());
    let sessions = Arc::new(SessionManager::new(session_store, Arc::new(SystemClock)));
    let cookie = Arc::new(SessionCookie::new(&config.session.signing_secret));

    // Start the metrics listener if configured
    let metrics_handle = if let Some(metrics_addr) = config.monitoring.metrics_addr {
        info!("Starting metrics server on {}", metrics_addr);

        let metrics_server = MetricsServer::new(metrics.clone(), metrics_addr);

        Some(tokio::spawn(async move {
            if let Err(e) = metrics_server.start().await {
                error!("Metrics server error: {}", e);
            }
        }))
    } else {
        info!("Metrics server disabled");
        None
    };

    let bind_addr = config.server.bind_addr;
    let state = AppState {
        config: Arc::new(config),
        credentials,
        sessions,
        cookie,
        metrics,
    };

    info!("🚀 Clubhouse started successfully!");
    info!("✅ Signup, login, members area, and admin role management are live");
    info!("🛑 Press Ctrl+C or send SIGTERM/SIGINT to shutdown gracefully");

    // Serves until a shutdown signal arrives
    let server = WebServer::new(bind_addr, state);
    server.start().await?;

    // Shutdown metrics server if it was started
    if let Some(handle) = metrics_handle {
        handle.abort();
        info!("Metrics server shutdown");
    }

    info!("Server shutdown complete");

    Ok(())
}

/// Create the bootstrap admin account when configured and absent
fn bootstrap_admin(config: &Config, credentials: &dyn CredentialStore) -> Result<()> {
    let (Some(identifier), Some(admin_password)) = (
        config.auth.initial_admin.as_deref(),
        config.auth.initial_admin_password.as_deref(),
    ) else {
        return Ok(());
    };

    if credentials.find_by_identifier(identifier)?.is_some() {
        info!("Bootstrap admin '{}' already exists", identifier);
        return Ok(());
    }

    let digest = password::hash_password(admin_password)?;
    let mut user = User::new(identifier.to_string(), digest);
    user.role = Role::Admin;
    credentials.create(user)?;

    info!("Created bootstrap admin account '{}'", identifier);
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(args: &CliArgs) -> Result<()> {
    let log_level = if args.verbose {
        "debug"
    } else {
        &args.log_level
    };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(true)
                .with_level(true)
                .with_ansi(true),
        )
        .with(env_filter)
        .init();

    Ok(())
}
