//! Configuration Types

use serde::Deserialize;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub session: SessionConfig,
    pub auth: AuthConfig,
    pub monitoring: MonitoringConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub static_dir: PathBuf,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub data_dir: PathBuf,
}

/// Session secrets
///
/// Both secrets are deployment-provided, normally through the environment.
/// There are no usable defaults and startup refuses short values.
#[derive(Clone, Deserialize)]
pub struct SessionConfig {
    pub signing_secret: String,
    pub encryption_secret: String,
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("signing_secret", &"<redacted>")
            .field("encryption_secret", &"<redacted>")
            .finish()
    }
}

/// Bootstrap authentication configuration
///
/// When both fields are set and the account does not exist yet, the
/// account is created with the admin role at startup. This is how the
/// first admin comes into existence.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub initial_admin: Option<String>,
    pub initial_admin_password: Option<String>,
}

/// Monitoring configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    pub metrics_addr: Option<SocketAddr>,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind_addr: "127.0.0.1:3000".parse().unwrap(),
                static_dir: PathBuf::from("public"),
            },
            database: DatabaseConfig {
                data_dir: PathBuf::from("data"),
            },
            session: SessionConfig {
                signing_secret: String::new(),
                encryption_secret: String::new(),
            },
            auth: AuthConfig {
                initial_admin: None,
                initial_admin_password: None,
            },
            monitoring: MonitoringConfig {
                metrics_addr: None,
                log_level: "info".to_string(),
            },
        }
    }
}
