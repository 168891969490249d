//! Configuration Manager

use super::Config;
use crate::credentials::valid_identifier;
use crate::Result;
use anyhow::{bail, Context};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Shortest secret accepted for signing or encryption
pub const MIN_SECRET_LEN: usize = 32;

/// Manages configuration loading and validation
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration from file
    ///
    /// Falls back to environment variables and defaults when the file does
    /// not exist. Secrets from the environment win over file values either
    /// way, so secret material never has to live on disk.
    pub fn load_from_file(path: &Path) -> Result<Config> {
        if path.exists() {
            tracing::info!("Loading configuration from: {}", path.display());
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;

            let mut config: Config = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

            Self::overlay_secrets_from_env(&mut config);
            config
                .validate()
                .with_context(|| "Configuration validation failed")?;

            tracing::info!("Configuration loaded and validated successfully");
            Ok(config)
        } else {
            tracing::warn!(
                "Configuration file not found at {}, using environment and defaults",
                path.display()
            );
            Self::load_from_env()
        }
    }

    /// Load configuration from environment variables
    pub fn load_from_env() -> Result<Config> {
        let mut config = Config::default();

        if let Ok(bind_addr) = std::env::var("CLUBHOUSE_BIND_ADDR") {
            config.server.bind_addr = bind_addr
                .parse::<SocketAddr>()
                .with_context(|| format!("Invalid CLUBHOUSE_BIND_ADDR: {}", bind_addr))?;
        }

        if let Ok(static_dir) = std::env::var("CLUBHOUSE_STATIC_DIR") {
            config.server.static_dir = PathBuf::from(static_dir);
        }

        if let Ok(data_dir) = std::env::var("CLUBHOUSE_DATA_DIR") {
            config.database.data_dir = PathBuf::from(data_dir);
        }

        if let Ok(metrics_addr) = std::env::var("CLUBHOUSE_METRICS_ADDR") {
            config.monitoring.metrics_addr = Some(
                metrics_addr
                    .parse::<SocketAddr>()
                    .with_context(|| format!("Invalid CLUBHOUSE_METRICS_ADDR: {}", metrics_addr))?,
            );
        }

        if let Ok(log_level) = std::env::var("CLUBHOUSE_LOG_LEVEL") {
            config.monitoring.log_level = log_level;
        }

        if let Ok(initial_admin) = std::env::var("CLUBHOUSE_INITIAL_ADMIN") {
            config.auth.initial_admin = Some(initial_admin);
        }

        if let Ok(password) = std::env::var("CLUBHOUSE_INITIAL_ADMIN_PASSWORD") {
            config.auth.initial_admin_password = Some(password);
        }

        Self::overlay_secrets_from_env(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Apply secret environment variables over whatever is already loaded
    fn overlay_secrets_from_env(config: &mut Config) {
        if let Ok(secret) = std::env::var("CLUBHOUSE_SIGNING_SECRET") {
            config.session.signing_secret = secret;
        }

        if let Ok(secret) = std::env::var("CLUBHOUSE_ENCRYPTION_SECRET") {
            config.session.encryption_secret = secret;
        }
    }
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.validate_server_config()
            .with_context(|| "Server configuration validation failed")?;

        self.validate_session_config()
            .with_context(|| "Session configuration validation failed")?;

        self.validate_auth_config()
            .with_context(|| "Auth configuration validation failed")?;

        self.validate_monitoring_config()
            .with_context(|| "Monitoring configuration validation failed")?;

        Ok(())
    }

    /// Validate server configuration
    fn validate_server_config(&self) -> Result<()> {
        if self.server.bind_addr.port() == 0 {
            bail!("server.bind_addr must name a concrete port");
        }

        if self.server.static_dir.as_os_str().is_empty() {
            bail!("server.static_dir must not be empty");
        }

        Ok(())
    }

    /// Validate session secrets
    fn validate_session_config(&self) -> Result<()> {
        if self.session.signing_secret.len() < MIN_SECRET_LEN {
            bail!(
                "session.signing_secret must be at least {} characters (set CLUBHOUSE_SIGNING_SECRET)",
                MIN_SECRET_LEN
            );
        }

        if self.session.encryption_secret.len() < MIN_SECRET_LEN {
            bail!(
                "session.encryption_secret must be at least {} characters (set CLUBHOUSE_ENCRYPTION_SECRET)",
                MIN_SECRET_LEN
            );
        }

        if self.session.signing_secret == self.session.encryption_secret {
            bail!("session signing and encryption secrets must differ");
        }

        Ok(())
    }

    /// Validate bootstrap admin configuration
    fn validate_auth_config(&self) -> Result<()> {
        match (
            &self.auth.initial_admin,
            &self.auth.initial_admin_password,
        ) {
            (Some(identifier), Some(password)) => {
                if !valid_identifier(identifier) {
                    bail!("auth.initial_admin is not an acceptable identifier");
                }
                if password.is_empty() {
                    bail!("auth.initial_admin_password must not be empty");
                }
            }
            (None, None) => {}
            _ => bail!("auth.initial_admin and auth.initial_admin_password must be set together"),
        }

        Ok(())
    }

    /// Validate monitoring configuration
    fn validate_monitoring_config(&self) -> Result<()> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.monitoring.log_level.as_str()) {
            bail!(
                "monitoring.log_level must be one of: {}",
                valid_log_levels.join(", ")
            );
        }

        Ok(())
    }

    /// Merge with CLI arguments
    pub fn merge_with_cli_args(
        &mut self,
        bind: Option<&str>,
        port: Option<u16>,
        data_dir: Option<PathBuf>,
    ) {
        if let Some(bind_str) = bind {
            if let Ok(addr) = bind_str.parse::<SocketAddr>() {
                self.server.bind_addr = addr;
                tracing::info!("CLI override: bind address set to {}", addr);
            } else {
                tracing::warn!("Invalid bind address provided: {}", bind_str);
            }
        }

        if let Some(port) = port {
            self.server.bind_addr.set_port(port);
            tracing::info!("CLI override: port set to {}", port);
        }

        if let Some(data_dir) = data_dir {
            tracing::info!("CLI override: data directory set to {}", data_dir.display());
            self.database.data_dir = data_dir;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> Config {
        let mut config = Config::default();
        config.session.signing_secret = "signing-secret-that-is-long-enough-ok".to_string();
        config.session.encryption_secret = "encryption-secret-that-is-long-enough".to_string();
        config
    }

    #[test]
    fn defaults_fail_validation_without_secrets() {
        assert!(Config::default().validate().is_err());
    }

    #[test]
    fn configured_secrets_pass_validation() {
        assert!(configured().validate().is_ok());
    }

    #[test]
    fn short_secrets_are_rejected() {
        let mut config = configured();
        config.session.signing_secret = "short".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn identical_secrets_are_rejected() {
        let mut config = configured();
        config.session.encryption_secret = config.session.signing_secret.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn bootstrap_admin_needs_both_fields() {
        let mut config = configured();
        config.auth.initial_admin = Some("root".to_string());
        assert!(config.validate().is_err());

        config.auth.initial_admin_password = Some("house-rules".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn bootstrap_admin_identifier_is_checked() {
        let mut config = configured();
        config.auth.initial_admin = Some("$admin".to_string());
        config.auth.initial_admin_password = Some("house-rules".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn nonsense_log_level_is_rejected() {
        let mut config = configured();
        config.monitoring.log_level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn cli_merge_overrides_bind_and_port() {
        let mut config = configured();
        config.merge_with_cli_args(Some("0.0.0.0:8000"), None, None);
        assert_eq!(config.server.bind_addr.to_string(), "0.0.0.0:8000");

        config.merge_with_cli_args(None, Some(9999), None);
        assert_eq!(config.server.bind_addr.port(), 9999);
    }

    #[test]
    fn parses_a_full_toml_document() {
        let toml_doc = r#"
            [server]
            bind_addr = "127.0.0.1:3000"
            static_dir = "public"

            [database]
            data_dir = "data"

            [session]
            signing_secret = "signing-secret-that-is-long-enough-ok"
            encryption_secret = "encryption-secret-that-is-long-enough"

            [auth]
            initial_admin = "root"
            initial_admin_password = "house-rules"

            [monitoring]
            metrics_addr = "127.0.0.1:9090"
            log_level = "debug"
        "#;

        let config: Config = toml::from_str(toml_doc).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.monitoring.log_level, "debug");
        assert_eq!(
            config.monitoring.metrics_addr.unwrap().port(),
            9090
        );
        assert_eq!(config.auth.initial_admin.as_deref(), Some("root"));
    }
}
