//! Contract Test: Range Registration
//!
//! Constraints verified:
//! - A range expands to every address, network and broadcast included
//! - Re-registration never resets the status of a known address
//! - Invalid ranges fail before anything is written
//! - A failed batch write leaves no partial range behind

mod common;

use common::*;
use ipam_core::{Address, AddressPool, AddressStatus, FileAddressStore};
use std::sync::Arc;

#[tokio::test]
async fn slash_31_registers_two_available_addresses() {
    let pool = memory_pool();

    let addrs = pool.register_range("1.1.1.0/31").await.unwrap();

    assert_eq!(
        addrs,
        vec![Address::available("1.1.1.0"), Address::available("1.1.1.1")]
    );
    assert_eq!(pool.list_all().await.unwrap(), addrs);
}

#[tokio::test]
async fn count_includes_lowest_and_highest_address() {
    let pool = memory_pool();

    let addrs = pool.register_range("10.20.30.0/24").await.unwrap();

    assert_eq!(addrs.len(), 256);
    assert_eq!(addrs.first().unwrap().ip, "10.20.30.0");
    assert_eq!(addrs.last().unwrap().ip, "10.20.30.255");
    assert!(addrs.iter().all(Address::is_available));
}

#[tokio::test]
async fn ipv6_range_is_expanded_in_numeric_order() {
    let pool = memory_pool();

    let addrs = pool.register_range("2001:db8::/126").await.unwrap();

    let ips: Vec<&str> = addrs.iter().map(|a| a.ip.as_str()).collect();
    assert_eq!(
        ips,
        vec!["2001:db8::", "2001:db8::1", "2001:db8::2", "2001:db8::3"]
    );
}

#[tokio::test]
async fn reregistration_keeps_acquired_status() {
    let pool = memory_pool();
    pool.register_range("1.1.1.0/31").await.unwrap();
    pool.acquire("1.1.1.1").await.unwrap();

    let again = pool.register_range("1.1.1.0/31").await.unwrap();

    assert_eq!(
        again,
        vec![
            Address::available("1.1.1.0"),
            Address::new("1.1.1.1", AddressStatus::Acquired),
        ]
    );
    let stored = pool.get_address("1.1.1.1").await.unwrap();
    assert_eq!(stored.status, AddressStatus::Acquired);
    assert_eq!(pool.list_all().await.unwrap().len(), 2);
}

#[tokio::test]
async fn overlapping_range_only_adds_new_addresses() {
    let pool = memory_pool();
    pool.register_range("10.0.0.0/31").await.unwrap();
    pool.acquire("10.0.0.0").await.unwrap();

    let addrs = pool.register_range("10.0.0.0/30").await.unwrap();

    assert_eq!(addrs.len(), 4);
    assert_eq!(addrs[0], Address::new("10.0.0.0", AddressStatus::Acquired));
    assert!(addrs[1..].iter().all(Address::is_available));
    assert_eq!(pool.list_all().await.unwrap().len(), 4);
}

#[tokio::test]
async fn invalid_ranges_fail_without_writes() {
    let (pool, store) = counting_pool();

    for text in ["", "not-an-ip", "xyz", "1.1.1.0/40", "300.0.0.0/24"] {
        let err = pool.register_range(text).await.unwrap_err();
        assert!(err.is_invalid_range(), "{:?} should be an invalid range", text);
    }

    assert_eq!(store.write_calls(), 0);
}

#[tokio::test]
async fn registration_is_a_single_batch_write() {
    let (pool, store) = counting_pool();

    pool.register_range("192.168.1.0/28").await.unwrap();

    assert_eq!(store.save_all_new_calls(), 1);
    assert_eq!(store.save_calls(), 0);
}

#[tokio::test]
async fn failed_batch_surfaces_store_error() {
    let pool = AddressPool::new(Arc::new(FailingBatchStore::default()));

    let err = pool.register_range("1.1.1.0/31").await.unwrap_err();

    assert!(!err.is_invalid_range());
    assert!(pool.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn file_store_registration_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("addresses.json");

    {
        let store = FileAddressStore::new(&path).await.unwrap();
        let pool = AddressPool::new(Arc::new(store));
        pool.register_range("1.1.1.0/31").await.unwrap();
        pool.acquire("1.1.1.0").await.unwrap();
    }

    let store = FileAddressStore::new(&path).await.unwrap();
    let pool = AddressPool::new(Arc::new(store));

    let addrs = pool.register_range("1.1.1.0/31").await.unwrap();
    assert_eq!(addrs[0], Address::new("1.1.1.0", AddressStatus::Acquired));
    assert_eq!(addrs[1], Address::available("1.1.1.1"));
}
