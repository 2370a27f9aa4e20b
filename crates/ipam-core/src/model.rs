//! Address record and its two-state status
//!
//! An [`Address`] is keyed by its canonical textual IP. Records are only
//! created by range registration and are never deleted; the status is the
//! only mutable field.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of an address record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressStatus {
    /// Free to be acquired (initial state)
    Available,
    /// Held by a caller until released
    Acquired,
}

impl AddressStatus {
    /// Wire name of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            AddressStatus::Available => "available",
            AddressStatus::Acquired => "acquired",
        }
    }
}

impl fmt::Display for AddressStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AddressStatus {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(AddressStatus::Available),
            "acquired" => Ok(AddressStatus::Acquired),
            other => Err(crate::Error::store(format!(
                "Unknown address status '{}'",
                other
            ))),
        }
    }
}

/// A single IP address tracked by the pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Canonical textual form, without prefix length
    pub ip: String,
    /// Current status
    pub status: AddressStatus,
}

impl Address {
    /// Create a record with an explicit status
    pub fn new(ip: impl Into<String>, status: AddressStatus) -> Self {
        Self {
            ip: ip.into(),
            status,
        }
    }

    /// Create a freshly registered record
    pub fn available(ip: impl Into<String>) -> Self {
        Self::new(ip, AddressStatus::Available)
    }

    /// Copy of this record with a different status
    pub fn with_status(&self, status: AddressStatus) -> Self {
        Self {
            ip: self.ip.clone(),
            status,
        }
    }

    pub fn is_available(&self) -> bool {
        self.status == AddressStatus::Available
    }
}
