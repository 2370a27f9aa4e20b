// # Memory Address Store
//
// In-memory implementation of AddressStore.
//
// ## Purpose
//
// Provides a simple, fast store that doesn't persist across restarts.
// Useful for testing and for deployments where the pool is re-registered
// on every start.
//
// ## Crash Behavior
//
// - All records are lost on restart/crash
// - Every address comes back as `available` after re-registration

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::AddressTable;
use crate::Error;
use crate::model::Address;
use crate::traits::{AddressStore, SwapOutcome};

/// In-memory address store implementation
///
/// All records live in one table behind a `RwLock`. Every write holds the
/// lock for its whole duration, so batch inserts and compare-and-swap are
/// serialized against each other.
///
/// # Example
///
/// ```rust,no_run
/// use ipam_core::{Address, AddressStore, MemoryAddressStore};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = MemoryAddressStore::new();
///
///     store.save_all_new(&[Address::available("10.0.0.1")]).await?;
///
///     let addr = store.find_by_ip("10.0.0.1").await?;
///     assert!(addr.is_some());
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryAddressStore {
    inner: Arc<RwLock<AddressTable>>,
}

impl MemoryAddressStore {
    /// Create a new empty memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of records in the store
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Check if the store is empty
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl AddressStore for MemoryAddressStore {
    async fn find_all(&self) -> Result<Vec<Address>, Error> {
        let guard = self.inner.read().await;
        Ok(guard.records().to_vec())
    }

    async fn find_by_ip(&self, ip: &str) -> Result<Option<Address>, Error> {
        let guard = self.inner.read().await;
        Ok(guard.get(ip).cloned())
    }

    async fn save(&self, address: &Address) -> Result<Address, Error> {
        let mut guard = self.inner.write().await;
        Ok(guard.upsert(address))
    }

    async fn save_all_new(&self, addresses: &[Address]) -> Result<Vec<Address>, Error> {
        let mut guard = self.inner.write().await;
        let (stored, inserted) = guard.insert_new(addresses);
        tracing::trace!(
            "Inserted {} of {} candidate addresses",
            inserted,
            addresses.len()
        );
        Ok(stored)
    }

    async fn compare_and_swap(
        &self,
        expected: &Address,
        updated: &Address,
    ) -> Result<SwapOutcome, Error> {
        let mut guard = self.inner.write().await;
        Ok(guard.compare_and_swap(expected, updated))
    }

    async fn flush(&self) -> Result<(), Error> {
        // No-op for memory store (everything is already "persisted")
        Ok(())
    }
}
