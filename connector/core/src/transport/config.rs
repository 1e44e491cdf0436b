//! Connector Configuration
//!
//! Transport-level settings applied when a connector is constructed.
//! There is no environment or file lookup here: the caller builds a
//! `ConnectorConfig` (directly or from a TOML snippet) and hands it to
//! `TlsSocketConnector::connect_with_config`.
//!
//! # Example
//!
//! ```toml
//! server_name = "kernel.example.net"
//! use_default_roots = false
//! extra_root_certs = ["/etc/kernel/ca.pem"]
//! connect_timeout_ms = 5000
//! ```

use std::path::PathBuf;
use std::time::Duration;

use rustls::pki_types::ServerName;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Connector configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectorConfig {
    /// Name used for SNI and certificate verification
    ///
    /// `None` verifies the certificate against the peer's IP address.
    pub server_name: Option<String>,

    /// Whether to trust the bundled web PKI root certificates
    pub use_default_roots: bool,

    /// PEM files holding additional trust anchors
    pub extra_root_certs: Vec<PathBuf>,

    /// TCP connect timeout in milliseconds (0 = OS default)
    pub connect_timeout_ms: u64,

    /// Socket read timeout in milliseconds (0 = block indefinitely)
    pub read_timeout_ms: u64,

    /// Socket write timeout in milliseconds (0 = block indefinitely)
    pub write_timeout_ms: u64,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            server_name: None,
            use_default_roots: true,
            extra_root_certs: Vec::new(),
            connect_timeout_ms: 0,
            read_timeout_ms: 0,
            write_timeout_ms: 0,
        }
    }
}

impl ConnectorConfig {
    /// Parse a configuration from a TOML string
    ///
    /// Missing keys take their default values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ParseError` for malformed TOML and
    /// `ConfigError::ValidationError` if the result fails [`Self::validate`].
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the name used for SNI and certificate verification
    #[must_use]
    pub fn with_server_name(mut self, name: impl Into<String>) -> Self {
        self.server_name = Some(name.into());
        self
    }

    /// Add a PEM file of trust anchors
    #[must_use]
    pub fn with_root_cert_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.extra_root_certs.push(path.into());
        self
    }

    /// Stop trusting the bundled web PKI roots
    #[must_use]
    pub fn without_default_roots(mut self) -> Self {
        self.use_default_roots = false;
        self
    }

    /// Check the configuration for values that can never connect
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if the server name is not a
    /// valid DNS name or IP address, or if no trust anchors are configured.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(name) = &self.server_name {
            ServerName::try_from(name.as_str()).map_err(|e| {
                ConfigError::ValidationError(format!("server_name {name:?}: {e}"))
            })?;
        }

        if !self.use_default_roots && self.extra_root_certs.is_empty() {
            return Err(ConfigError::ValidationError(
                "no trust anchors: enable use_default_roots or list extra_root_certs".into(),
            ));
        }

        Ok(())
    }

    /// TCP connect timeout, if any
    #[must_use]
    pub fn connect_timeout(&self) -> Option<Duration> {
        millis(self.connect_timeout_ms)
    }

    /// Socket read timeout, if any
    #[must_use]
    pub fn read_timeout(&self) -> Option<Duration> {
        millis(self.read_timeout_ms)
    }

    /// Socket write timeout, if any
    #[must_use]
    pub fn write_timeout(&self) -> Option<Duration> {
        millis(self.write_timeout_ms)
    }
}

// Zero means "no timeout"; the socket API rejects a zero duration.
fn millis(ms: u64) -> Option<Duration> {
    (ms > 0).then_some(Duration::from_millis(ms))
}
