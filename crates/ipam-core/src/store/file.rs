// # File Address Store
//
// File-based implementation of AddressStore with crash recovery.
//
// ## Purpose
//
// Provides persistent address records across daemon restarts and crashes.
//
// ## Crash Recovery
//
// - Atomic writes: Uses write-then-rename for atomicity
// - Corruption detection: Validates JSON on load
// - Automatic backup: Keeps <path>.backup of last known good state
// - Recovery: Falls back to backup if corruption detected
//
// ## Batch Atomicity
//
// Every mutation is written through before the call returns. If the write
// fails, the in-memory table is rolled back to its state before the call,
// so a registered range is either fully visible or not at all.
//
// ## File Format
//
// ```json
// {
//   "version": "1.0",
//   "addresses": [
//     { "ip": "1.1.1.0", "status": "available" },
//     { "ip": "1.1.1.1", "status": "acquired" }
//   ]
// }
// ```

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

use super::AddressTable;
use crate::Error;
use crate::model::Address;
use crate::traits::{AddressStore, SwapOutcome};

/// Store file format version
const STORE_FILE_VERSION: &str = "1.0";

/// File-based address store with crash recovery
///
/// # Example
///
/// ```rust,no_run
/// use ipam_core::{Address, AddressStore, FileAddressStore};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = FileAddressStore::new("/var/lib/ipam/addresses.json").await?;
///
///     // Atomically written to disk before returning
///     store.save_all_new(&[Address::available("10.0.0.1")]).await?;
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct FileAddressStore {
    path: PathBuf,
    table: RwLock<AddressTable>,
}

/// Serializable store file format
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct StoreFileFormat {
    version: String,
    addresses: Vec<Address>,
}

impl FileAddressStore {
    /// Create or load a file address store
    ///
    /// This will:
    /// 1. Create parent directories if needed
    /// 2. Try to load the existing store file
    /// 3. If corruption is detected, try to load from backup
    /// 4. If both fail, start with an empty store
    pub async fn new<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).await.map_err(|e| {
                Error::config(format!(
                    "Failed to create store directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let records = Self::load_with_recovery(&path).await?;

        Ok(Self {
            path,
            table: RwLock::new(AddressTable::from_records(records)),
        })
    }

    /// Load records with automatic recovery from the backup file
    async fn load_with_recovery(path: &Path) -> Result<Vec<Address>, Error> {
        let e = match Self::load(path).await {
            Ok(records) => {
                tracing::debug!("Loaded address store: {} records", records.len());
                return Ok(records);
            }
            Err(Error::Json(e)) => e,
            Err(other) => return Err(other),
        };

        tracing::warn!(
            "Store file {} appears corrupted: {}. Attempting recovery from backup.",
            path.display(),
            e
        );

        let backup_path = Self::backup_path(path);
        if !backup_path.exists() {
            tracing::warn!("No backup file found. Starting with empty store.");
            return Ok(Vec::new());
        }

        match Self::load(&backup_path).await {
            Ok(records) => {
                tracing::info!("Recovered store from backup: {} records", records.len());
                if let Err(restore_err) = fs::copy(&backup_path, path).await {
                    tracing::error!(
                        "Failed to restore store file from backup: {}",
                        restore_err
                    );
                }
                Ok(records)
            }
            Err(backup_err) => {
                tracing::error!(
                    "Backup also unreadable: {}. Starting with empty store.",
                    backup_err
                );
                Ok(Vec::new())
            }
        }
    }

    /// Load records from a store file; JSON problems surface as `Error::Json`
    async fn load(path: &Path) -> Result<Vec<Address>, Error> {
        if !path.exists() {
            tracing::debug!("Store file does not exist: {}", path.display());
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(path).await.map_err(|e| {
            Error::store(format!("Failed to read store file {}: {}", path.display(), e))
        })?;

        let store_file: StoreFileFormat = serde_json::from_str(&content)?;

        if store_file.version != STORE_FILE_VERSION {
            tracing::warn!(
                "Store file version mismatch: expected {}, got {}. Attempting to load anyway.",
                STORE_FILE_VERSION,
                store_file.version
            );
        }

        Ok(store_file.addresses)
    }

    /// Write the table to disk atomically (temp file + rename)
    async fn write(&self, table: &AddressTable) -> Result<(), Error> {
        let store_file = StoreFileFormat {
            version: STORE_FILE_VERSION.to_string(),
            addresses: table.records().to_vec(),
        };

        let json = serde_json::to_string_pretty(&store_file)
            .map_err(|e| Error::store(format!("Failed to serialize store: {}", e)))?;

        let temp_path = self.temp_path();
        {
            let mut file = fs::File::create(&temp_path).await.map_err(|e| {
                Error::store(format!(
                    "Failed to create temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.write_all(json.as_bytes()).await.map_err(|e| {
                Error::store(format!(
                    "Failed to write to temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.sync_all().await.map_err(|e| {
                Error::store(format!(
                    "Failed to sync temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;
        }

        if self.path.exists() {
            let backup_path = Self::backup_path(&self.path);
            if let Err(e) = fs::copy(&self.path, &backup_path).await {
                tracing::warn!("Failed to create backup: {}", e);
            }
        }

        fs::rename(&temp_path, &self.path).await.map_err(|e| {
            Error::store(format!(
                "Failed to rename {} to {}: {}",
                temp_path.display(),
                self.path.display(),
                e
            ))
        })?;

        tracing::trace!("Address store written to {}", self.path.display());
        Ok(())
    }

    /// Apply `change` and write through; rolls the table back if the write fails
    ///
    /// `change` returns its result plus whether anything was modified.
    async fn write_through<T>(
        &self,
        change: impl FnOnce(&mut AddressTable) -> (T, bool),
    ) -> Result<T, Error> {
        let mut guard = self.table.write().await;
        let snapshot = guard.clone();

        let (out, modified) = change(&mut *guard);
        if !modified {
            return Ok(out);
        }

        if let Err(e) = self.write(&*guard).await {
            *guard = snapshot;
            tracing::error!("Address store write failed, change rolled back: {}", e);
            return Err(e);
        }
        Ok(out)
    }

    fn temp_path(&self) -> PathBuf {
        Self::suffixed_path(&self.path, ".tmp")
    }

    fn backup_path(path: &Path) -> PathBuf {
        Self::suffixed_path(path, ".backup")
    }

    /// `path` with `suffix` appended to the full file name (`a.json` -> `a.json.tmp`)
    fn suffixed_path(path: &Path, suffix: &str) -> PathBuf {
        let mut name = path.as_os_str().to_owned();
        name.push(suffix);
        PathBuf::from(name)
    }
}

#[async_trait]
impl AddressStore for FileAddressStore {
    async fn find_all(&self) -> Result<Vec<Address>, Error> {
        let guard = self.table.read().await;
        Ok(guard.records().to_vec())
    }

    async fn find_by_ip(&self, ip: &str) -> Result<Option<Address>, Error> {
        let guard = self.table.read().await;
        Ok(guard.get(ip).cloned())
    }

    async fn save(&self, address: &Address) -> Result<Address, Error> {
        self.write_through(|table| (table.upsert(address), true))
            .await
    }

    async fn save_all_new(&self, addresses: &[Address]) -> Result<Vec<Address>, Error> {
        self.write_through(|table| {
            let (stored, inserted) = table.insert_new(addresses);
            (stored, inserted > 0)
        })
        .await
    }

    async fn compare_and_swap(
        &self,
        expected: &Address,
        updated: &Address,
    ) -> Result<SwapOutcome, Error> {
        self.write_through(|table| {
            let outcome = table.compare_and_swap(expected, updated);
            let swapped = matches!(outcome, SwapOutcome::Swapped(_));
            (outcome, swapped)
        })
        .await
    }

    async fn flush(&self) -> Result<(), Error> {
        let guard = self.table.read().await;
        self.write(&*guard).await
    }
}
