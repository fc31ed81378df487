use log::warn;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use super::traits::{KeyValueStore, StorageError};

/// In-process key-value store.
///
/// Useful for ephemeral sessions and tests. Writes can be switched off to
/// behave like a full or disabled browser store.
#[derive(Debug)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    writable: AtomicBool,
    rejected_keys: Mutex<HashSet<String>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            values: Mutex::new(HashMap::new()),
            writable: AtomicBool::new(true),
            rejected_keys: Mutex::new(HashSet::new()),
        }
    }

    /// Make every following `set` fail with `QuotaExceeded` (or succeed again)
    pub fn set_writable(&self, writable: bool) {
        self.writable.store(writable, Ordering::SeqCst);
    }

    /// Make writes to `key` alone fail with `QuotaExceeded`, e.g. a document
    /// that no longer fits while small ones still do
    pub fn reject_writes_to(&self, key: &str) {
        self.rejected_keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string());
    }

    /// Plant a raw value, bypassing the write switch
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
    }

    /// Raw value currently stored under `key`
    pub fn raw(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.raw(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if !self.writable.load(Ordering::SeqCst) {
            warn!("Rejecting write to '{}': store is not writable", key);
            return Err(StorageError::QuotaExceeded(key.to_string()));
        }
        let rejected = self
            .rejected_keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(key);
        if rejected {
            warn!("Rejecting write to '{}': no room left for this key", key);
            return Err(StorageError::QuotaExceeded(key.to_string()));
        }
        self.insert_raw(key, value);
        Ok(())
    }
}
