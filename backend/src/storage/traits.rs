//! # Storage Traits
//!
//! This module defines the key-value abstraction that every persistence
//! backend implements, so the document layer and the domain services never
//! know whether data lands in files, memory, or something else.

use thiserror::Error;

/// Errors raised by a storage backend.
///
/// None of these are fatal for the session: the caller keeps its in-memory
/// state and decides whether to surface the failure.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize document: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage quota exceeded while writing '{0}'")]
    QuotaExceeded(String),

    #[error("Storage is unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid storage key '{0}'")]
    InvalidKey(String),
}

/// Raw document storage keyed by fixed names.
///
/// Values are opaque strings (serialized JSON in practice). A missing key is
/// `Ok(None)`, never an error.
pub trait KeyValueStore: Send + Sync {
    /// Read the raw document stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the raw document stored under `key`
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}
