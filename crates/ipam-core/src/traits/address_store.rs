// # Address Store Trait
//
// Defines the interface for durable storage of address records.
//
// ## Purpose
//
// The address store owns the uniqueness of records (one per `ip`) and the
// difference between "insert new" and "overwrite" writes:
// - `save` is an unconditional upsert
// - `save_all_new` only inserts keys that do not exist yet
// - `compare_and_swap` writes only if the stored record is unchanged
//
// ## Implementations
//
// - In-memory: `MemoryAddressStore`
// - File-based: `FileAddressStore` (JSON, atomic rename)
//
// ## Usage
//
// ```rust,ignore
// use ipam_core::{Address, AddressStore, MemoryAddressStore};
//
// let store = MemoryAddressStore::new();
// store.save_all_new(&[Address::available("10.0.0.1")]).await?;
// let addr = store.find_by_ip("10.0.0.1").await?;
// ```

use async_trait::async_trait;

use crate::model::Address;

/// Result of a [`AddressStore::compare_and_swap`] call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapOutcome {
    /// The stored record matched and was replaced; carries the stored value
    Swapped(Address),
    /// The stored record changed since it was read; carries its current value
    Stale(Address),
    /// No record exists for the ip
    Missing,
}

/// Trait for address store implementations
///
/// Implementations must be thread-safe and usable across async tasks.
///
/// # Atomicity
///
/// - `save_all_new` runs as a single unit: the existence checks and inserts
///   of one batch are serialized against every other write, and either the
///   whole batch becomes visible or none of it does.
/// - `compare_and_swap` is a single read-compare-write unit. The pool relies
///   on it to make acquire free of lost updates.
///
/// ## Forbidden Capabilities
/// - ❌ Deleting records (addresses are never removed)
/// - ❌ Rewriting the `ip` of a stored record
/// - ❌ Implementing the acquire/release rules (owned by `AddressPool`)
#[async_trait]
pub trait AddressStore: Send + Sync {
    /// Return every stored record
    ///
    /// Order is not significant; the bundled stores return insertion order.
    async fn find_all(&self) -> Result<Vec<Address>, crate::Error>;

    /// Point lookup by exact ip text
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Address))`: The stored record
    /// - `Ok(None)`: No record found
    /// - `Err(Error)`: Storage error
    async fn find_by_ip(&self, ip: &str) -> Result<Option<Address>, crate::Error>;

    /// Unconditional upsert; returns the stored value
    async fn save(&self, address: &Address) -> Result<Address, crate::Error>;

    /// Insert-only bulk write
    ///
    /// For each candidate, an existing record with the same ip is kept
    /// unchanged and returned in its place; otherwise the candidate is
    /// stored as-is. The output has the same order and length as the input.
    async fn save_all_new(&self, addresses: &[Address]) -> Result<Vec<Address>, crate::Error>;

    /// Replace the record for `updated.ip` only if it still equals `expected`
    async fn compare_and_swap(
        &self,
        expected: &Address,
        updated: &Address,
    ) -> Result<SwapOutcome, crate::Error>;

    /// Persist any pending changes
    ///
    /// Stores that write through on every mutation may treat this as a no-op.
    async fn flush(&self) -> Result<(), crate::Error>;
}
