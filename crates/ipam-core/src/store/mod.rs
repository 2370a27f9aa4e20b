// # Address Store Implementations
//
// This module provides implementations of the AddressStore trait for
// different persistence strategies, plus the insertion-ordered table
// both of them are built on.

pub mod file;
pub mod memory;

pub use file::FileAddressStore;
pub use memory::MemoryAddressStore;

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::StoreConfig;
use crate::error::Result;
use crate::model::Address;
use crate::traits::{AddressStore, SwapOutcome};

/// Open the store described by `config`
pub async fn open_store(config: &StoreConfig) -> Result<Arc<dyn AddressStore>> {
    match config {
        StoreConfig::Memory => {
            tracing::info!("Using in-memory address store");
            Ok(Arc::new(MemoryAddressStore::new()))
        }
        StoreConfig::File { path } => {
            tracing::info!("Using file address store at {}", path);
            Ok(Arc::new(FileAddressStore::new(path).await?))
        }
    }
}

/// Address records keyed by ip, kept in insertion order
#[derive(Debug, Clone, Default)]
pub(crate) struct AddressTable {
    records: Vec<Address>,
    index: HashMap<String, usize>,
}

impl AddressTable {
    /// Build a table from persisted records; the first record for an ip wins
    pub(crate) fn from_records(records: Vec<Address>) -> Self {
        let mut table = Self::default();
        for record in records {
            if table.index.contains_key(&record.ip) {
                tracing::warn!("Ignoring duplicate record for {} in stored state", record.ip);
                continue;
            }
            table.push(record);
        }
        table
    }

    pub(crate) fn records(&self) -> &[Address] {
        &self.records
    }

    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }

    pub(crate) fn get(&self, ip: &str) -> Option<&Address> {
        self.index.get(ip).map(|&slot| &self.records[slot])
    }

    pub(crate) fn upsert(&mut self, address: &Address) -> Address {
        match self.index.get(&address.ip) {
            Some(&slot) => self.records[slot].status = address.status,
            None => self.push(address.clone()),
        }
        address.clone()
    }

    /// Insert candidates whose ip is unknown; returns the stored value for
    /// every candidate (in input order) and the number actually inserted
    pub(crate) fn insert_new(&mut self, addresses: &[Address]) -> (Vec<Address>, usize) {
        let mut stored = Vec::with_capacity(addresses.len());
        let mut inserted = 0;
        for candidate in addresses {
            match self.get(&candidate.ip) {
                Some(existing) => stored.push(existing.clone()),
                None => {
                    self.push(candidate.clone());
                    inserted += 1;
                    stored.push(candidate.clone());
                }
            }
        }
        (stored, inserted)
    }

    pub(crate) fn compare_and_swap(&mut self, expected: &Address, updated: &Address) -> SwapOutcome {
        let Some(&slot) = self.index.get(&updated.ip) else {
            return SwapOutcome::Missing;
        };
        let current = &mut self.records[slot];
        if current != expected {
            return SwapOutcome::Stale(current.clone());
        }
        current.status = updated.status;
        SwapOutcome::Swapped(current.clone())
    }

    fn push(&mut self, address: Address) {
        self.index.insert(address.ip.clone(), self.records.len());
        self.records.push(address);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AddressStatus;

    #[test]
    fn test_insert_new_keeps_existing_record() {
        let mut table = AddressTable::default();
        table.upsert(&Address::new("10.0.0.1", AddressStatus::Acquired));

        let (stored, inserted) = table.insert_new(&[
            Address::available("10.0.0.0"),
            Address::available("10.0.0.1"),
        ]);

        assert_eq!(inserted, 1);
        assert_eq!(stored[0], Address::available("10.0.0.0"));
        assert_eq!(stored[1], Address::new("10.0.0.1", AddressStatus::Acquired));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_insert_new_duplicate_within_batch() {
        let mut table = AddressTable::default();
        let (stored, inserted) = table.insert_new(&[
            Address::available("10.0.0.1"),
            Address::new("10.0.0.1", AddressStatus::Acquired),
        ]);

        assert_eq!(inserted, 1);
        assert_eq!(stored, vec![Address::available("10.0.0.1"); 2]);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_from_records_first_wins() {
        let table = AddressTable::from_records(vec![
            Address::new("10.0.0.1", AddressStatus::Acquired),
            Address::available("10.0.0.1"),
        ]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("10.0.0.1").unwrap().status, AddressStatus::Acquired);
    }

    #[test]
    fn test_compare_and_swap_outcomes() {
        let mut table = AddressTable::default();
        let available = Address::available("10.0.0.1");
        let acquired = available.with_status(AddressStatus::Acquired);
        table.upsert(&available);

        assert_eq!(
            table.compare_and_swap(&available, &acquired),
            SwapOutcome::Swapped(acquired.clone())
        );
        assert_eq!(
            table.compare_and_swap(&available, &acquired),
            SwapOutcome::Stale(acquired.clone())
        );
        assert_eq!(
            table.compare_and_swap(&Address::available("10.0.0.2"), &Address::available("10.0.0.2")),
            SwapOutcome::Missing
        );
    }
}
