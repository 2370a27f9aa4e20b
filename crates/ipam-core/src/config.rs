//! Configuration types for the IP address pool
//!
//! This module defines all configuration structures used throughout the crate.

use serde::{Deserialize, Serialize};

/// Main pool configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IpamConfig {
    /// Address store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Pool behaviour settings
    #[serde(default)]
    pub pool: PoolConfig,
}

impl IpamConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.store.validate()?;
        self.pool.validate()?;
        Ok(())
    }
}

/// Address store configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreConfig {
    /// In-memory store (not persistent)
    #[default]
    Memory,

    /// File-based store
    File {
        /// Path to the store file
        path: String,
    },
}

impl StoreConfig {
    /// Validate the store configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            StoreConfig::File { path } if path.trim().is_empty() => {
                Err(crate::Error::config("File store path cannot be empty"))
            }
            _ => Ok(()),
        }
    }

    /// Get the store type name
    pub fn type_name(&self) -> &'static str {
        match self {
            StoreConfig::Memory => "memory",
            StoreConfig::File { .. } => "file",
        }
    }
}

/// Pool settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Largest number of addresses a single range registration may create
    ///
    /// Every address of a range is stored as its own record, so very wide
    /// prefixes (e.g. an IPv6 /64) are rejected as invalid ranges.
    ///
    /// Default: 65536 addresses (an IPv4 /16)
    #[serde(default = "default_max_range_size")]
    pub max_range_size: u64,
}

impl PoolConfig {
    /// Validate the pool configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.max_range_size == 0 {
            return Err(crate::Error::config("Maximum range size must be > 0"));
        }
        Ok(())
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_range_size: default_max_range_size(),
        }
    }
}

pub(crate) fn default_max_range_size() -> u64 {
    65_536
}
