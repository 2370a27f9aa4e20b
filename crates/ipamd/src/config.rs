//! Daemon configuration from environment variables

use anyhow::Result;
use ipam_core::{IpamConfig, PoolConfig, StoreConfig};
use std::net::SocketAddr;
use tracing::Level;

const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub store_type: String,
    pub store_path: Option<String>,
    pub max_range_size: Option<String>,
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            listen_addr: lookup("IPAM_LISTEN_ADDR")
                .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string()),
            store_type: lookup("IPAM_STORE_TYPE").unwrap_or_else(|| "memory".to_string()),
            store_path: lookup("IPAM_STORE_PATH"),
            max_range_size: lookup("IPAM_MAX_RANGE_SIZE"),
            log_level: lookup("IPAM_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        }
    }

    /// Validate the configuration and build the core configuration from it
    pub fn validate(&self) -> Result<IpamConfig> {
        self.socket_addr()?;
        self.log_level()?;

        let store = match self.store_type.as_str() {
            "memory" => StoreConfig::Memory,
            "file" => match self.store_path.as_deref() {
                Some(path) if !path.trim().is_empty() => StoreConfig::File {
                    path: path.to_string(),
                },
                _ => anyhow::bail!(
                    "IPAM_STORE_PATH is required when IPAM_STORE_TYPE=file. \
                    Set it via: export IPAM_STORE_PATH=/var/lib/ipam/addresses.json"
                ),
            },
            other => anyhow::bail!(
                "IPAM_STORE_TYPE '{}' is not supported. Supported types: memory, file",
                other
            ),
        };

        let mut pool = PoolConfig::default();
        if let Some(raw) = &self.max_range_size {
            pool.max_range_size = raw.parse().map_err(|_| {
                anyhow::anyhow!(
                    "IPAM_MAX_RANGE_SIZE must be a positive integer. Got: {}",
                    raw
                )
            })?;
        }

        let config = IpamConfig { store, pool };
        config.validate()?;
        Ok(config)
    }

    /// Parsed listen address
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.listen_addr.parse().map_err(|_| {
            anyhow::anyhow!(
                "IPAM_LISTEN_ADDR '{}' is not a valid socket address (e.g. 0.0.0.0:8080)",
                self.listen_addr
            )
        })
    }

    /// Parsed log level
    pub fn log_level(&self) -> Result<Level> {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Ok(Level::TRACE),
            "debug" => Ok(Level::DEBUG),
            "info" => Ok(Level::INFO),
            "warn" => Ok(Level::WARN),
            "error" => Ok(Level::ERROR),
            _ => anyhow::bail!(
                "IPAM_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }
    }
}
