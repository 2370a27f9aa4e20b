//! Test doubles and common utilities for pool contract tests
//!
//! These wrap the in-memory store to count calls, inject failures, or force
//! concurrent callers to interleave at a chosen point.

#![allow(dead_code)]

use async_trait::async_trait;
use ipam_core::error::Result;
use ipam_core::{Address, AddressPool, AddressStore, Error, MemoryAddressStore, SwapOutcome};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Barrier;

/// A store that counts calls per operation
#[derive(Default)]
pub struct CountingStore {
    inner: MemoryAddressStore,
    find_all_calls: AtomicUsize,
    find_calls: AtomicUsize,
    save_calls: AtomicUsize,
    save_all_new_calls: AtomicUsize,
    swap_calls: AtomicUsize,
}

impl CountingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find_calls(&self) -> usize {
        self.find_calls.load(Ordering::SeqCst)
    }

    pub fn save_calls(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
    }

    pub fn save_all_new_calls(&self) -> usize {
        self.save_all_new_calls.load(Ordering::SeqCst)
    }

    pub fn swap_calls(&self) -> usize {
        self.swap_calls.load(Ordering::SeqCst)
    }

    /// Total number of write calls of any kind
    pub fn write_calls(&self) -> usize {
        self.save_calls() + self.save_all_new_calls() + self.swap_calls()
    }
}

#[async_trait]
impl AddressStore for CountingStore {
    async fn find_all(&self) -> Result<Vec<Address>> {
        self.find_all_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.find_all().await
    }

    async fn find_by_ip(&self, ip: &str) -> Result<Option<Address>> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_ip(ip).await
    }

    async fn save(&self, address: &Address) -> Result<Address> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.save(address).await
    }

    async fn save_all_new(&self, addresses: &[Address]) -> Result<Vec<Address>> {
        self.save_all_new_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.save_all_new(addresses).await
    }

    async fn compare_and_swap(&self, expected: &Address, updated: &Address) -> Result<SwapOutcome> {
        self.swap_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.compare_and_swap(expected, updated).await
    }

    async fn flush(&self) -> Result<()> {
        Ok(())
    }
}

/// A store whose batch writes always fail
#[derive(Default)]
pub struct FailingBatchStore {
    inner: MemoryAddressStore,
}

#[async_trait]
impl AddressStore for FailingBatchStore {
    async fn find_all(&self) -> Result<Vec<Address>> {
        self.inner.find_all().await
    }

    async fn find_by_ip(&self, ip: &str) -> Result<Option<Address>> {
        self.inner.find_by_ip(ip).await
    }

    async fn save(&self, address: &Address) -> Result<Address> {
        self.inner.save(address).await
    }

    async fn save_all_new(&self, _addresses: &[Address]) -> Result<Vec<Address>> {
        Err(Error::store("disk full"))
    }

    async fn compare_and_swap(&self, expected: &Address, updated: &Address) -> Result<SwapOutcome> {
        self.inner.compare_and_swap(expected, updated).await
    }

    async fn flush(&self) -> Result<()> {
        Ok(())
    }
}

/// A store that holds every `find_by_ip` caller until `parties` callers
/// have read, so concurrent read-modify-write sequences overlap
pub struct BarrierStore {
    inner: MemoryAddressStore,
    barrier: Barrier,
}

impl BarrierStore {
    pub fn new(inner: MemoryAddressStore, parties: usize) -> Self {
        Self {
            inner,
            barrier: Barrier::new(parties),
        }
    }
}

#[async_trait]
impl AddressStore for BarrierStore {
    async fn find_all(&self) -> Result<Vec<Address>> {
        self.inner.find_all().await
    }

    async fn find_by_ip(&self, ip: &str) -> Result<Option<Address>> {
        let found = self.inner.find_by_ip(ip).await;
        self.barrier.wait().await;
        found
    }

    async fn save(&self, address: &Address) -> Result<Address> {
        self.inner.save(address).await
    }

    async fn save_all_new(&self, addresses: &[Address]) -> Result<Vec<Address>> {
        self.inner.save_all_new(addresses).await
    }

    async fn compare_and_swap(&self, expected: &Address, updated: &Address) -> Result<SwapOutcome> {
        self.inner.compare_and_swap(expected, updated).await
    }

    async fn flush(&self) -> Result<()> {
        Ok(())
    }
}

/// Pool over a fresh in-memory store
pub fn memory_pool() -> AddressPool {
    AddressPool::new(Arc::new(MemoryAddressStore::new()))
}

/// Pool over a counting store, returning both
pub fn counting_pool() -> (AddressPool, Arc<CountingStore>) {
    let store = Arc::new(CountingStore::new());
    (AddressPool::new(store.clone()), store)
}
