//! Address pool
//!
//! The `AddressPool` is the component callers talk to. It is responsible for:
//! - Expanding CIDR ranges into individual address records
//! - Enforcing the acquire/release state machine
//!
//! ## State Machine
//!
//! ```text
//!              acquire (guarded)
//!   ┌───────────┐ ───────────────▶ ┌──────────┐
//!   │ available │                  │ acquired │
//!   └───────────┘ ◀─────────────── └──────────┘
//!        ▲  │      release (always)
//!        └──┘
//!       release
//! ```
//!
//! Acquire is only valid from `available`; acquiring an acquired address is
//! a conflict. Release succeeds from either state.
//!
//! The pool holds no mutable state of its own. Uniqueness, batch atomicity
//! and lost-update freedom come from the [`AddressStore`].

pub mod range;

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::{PoolConfig, default_max_range_size};
use crate::error::{Error, Result};
use crate::model::{Address, AddressStatus};
use crate::traits::{AddressStore, SwapOutcome};

pub use range::{expand_range, parse_range, range_size};

/// Stateless acquire/release logic over an address store
#[derive(Clone)]
pub struct AddressPool {
    store: Arc<dyn AddressStore>,
    max_range_size: u64,
}

impl AddressPool {
    /// Create a pool with default settings
    pub fn new(store: Arc<dyn AddressStore>) -> Self {
        Self {
            store,
            max_range_size: default_max_range_size(),
        }
    }

    /// Create a pool from configuration
    pub fn from_config(store: Arc<dyn AddressStore>, config: &PoolConfig) -> Self {
        Self::new(store).with_max_range_size(config.max_range_size)
    }

    /// Set the largest range a single registration may create
    pub fn with_max_range_size(mut self, max_range_size: u64) -> Self {
        self.max_range_size = max_range_size;
        self
    }

    /// Register every address of a CIDR range
    ///
    /// New addresses are stored as `available`. Addresses the store already
    /// knows keep their current status and are returned as stored. The
    /// result follows the range's numeric order.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidRange`]: empty or malformed text
    /// - [`Error::RangeTooLarge`]: well-formed, but larger than the configured
    ///   maximum
    /// - Store errors from the batch write, which leaves no partial range.
    ///
    /// Nothing is written for either range error.
    pub async fn register_range(&self, range_text: &str) -> Result<Vec<Address>> {
        let net = parse_range(range_text)?;

        let size = range_size(&net);
        if size.is_none_or(|size| size > u128::from(self.max_range_size)) {
            warn!("Rejected range {}: exceeds {} addresses", net, self.max_range_size);
            return Err(Error::range_too_large(net.to_string(), self.max_range_size));
        }

        let candidates: Vec<Address> = expand_range(&net)
            .into_iter()
            .map(Address::available)
            .collect();

        info!(
            "Adding new range {} with {} addresses",
            net,
            candidates.len()
        );
        self.store.save_all_new(&candidates).await
    }

    /// Every stored address, as returned by the store
    pub async fn list_all(&self) -> Result<Vec<Address>> {
        debug!("Fetching all addresses");
        self.store.find_all().await
    }

    /// Look up one address by its exact canonical text
    pub async fn get_address(&self, ip: &str) -> Result<Address> {
        debug!("Fetching address {}", ip);
        self.find(ip).await
    }

    /// Transition an address from `available` to `acquired`
    ///
    /// # Errors
    ///
    /// - [`Error::AddressNotFound`]: no record for `ip`
    /// - [`Error::Conflict`]: the address is not `available`; of several
    ///   concurrent acquires on one address exactly one succeeds
    pub async fn acquire(&self, ip: &str) -> Result<Address> {
        let mut current = self.find(ip).await?;

        loop {
            if !current.is_available() {
                warn!(
                    "Address {} not acquired: current status is '{}'",
                    current.ip, current.status
                );
                return Err(Error::conflict(format!(
                    "Only addresses with status '{}' may be acquired",
                    AddressStatus::Available
                )));
            }

            let updated = current.with_status(AddressStatus::Acquired);
            match self.store.compare_and_swap(&current, &updated).await? {
                SwapOutcome::Swapped(stored) => {
                    info!(
                        "Address {} ACQUIRED: status set from '{}' to '{}'",
                        stored.ip, current.status, stored.status
                    );
                    return Ok(stored);
                }
                SwapOutcome::Stale(latest) => {
                    debug!("Address {} changed concurrently, re-checking", ip);
                    current = latest;
                }
                SwapOutcome::Missing => return Err(Error::not_found(ip)),
            }
        }
    }

    /// Set an address back to `available`, whatever its current status
    ///
    /// Releasing an address that is already available succeeds.
    pub async fn release(&self, ip: &str) -> Result<Address> {
        let current = self.find(ip).await?;

        let stored = self
            .store
            .save(&current.with_status(AddressStatus::Available))
            .await?;
        info!(
            "Address {} RELEASED: status set from '{}' to '{}'",
            stored.ip, current.status, stored.status
        );
        Ok(stored)
    }

    async fn find(&self, ip: &str) -> Result<Address> {
        self.store
            .find_by_ip(ip)
            .await?
            .ok_or_else(|| Error::not_found(ip))
    }
}

impl std::fmt::Debug for AddressPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AddressPool")
            .field("max_range_size", &self.max_range_size)
            .finish_non_exhaustive()
    }
}
