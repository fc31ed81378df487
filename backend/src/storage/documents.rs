//! # Document Store
//!
//! Typed access to the four persisted documents. This is the only place that
//! knows the storage key names and the JSON encoding of each document.
//!
//! Reads never fail: a missing, unreadable or corrupt document is logged and
//! treated as absent. Writes return the backend error so callers can decide
//! what to do with it.

use chrono::{DateTime, SecondsFormat, Utc};
use log::{debug, error, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared::{GiftCard, Item};
use std::sync::Arc;

use super::traits::{KeyValueStore, StorageError};

/// The fixed logical keys of the persisted documents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKey {
    Items,
    GiftCards,
    Categories,
    LastSync,
}

impl StorageKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::Items => "wishlist-data",
            StorageKey::GiftCards => "gift-cards-data",
            StorageKey::Categories => "wishlist-categories",
            StorageKey::LastSync => "wishlist-last-sync",
        }
    }
}

/// Serializing wrapper around a [`KeyValueStore`]
#[derive(Clone)]
pub struct DocumentStore {
    store: Arc<dyn KeyValueStore>,
}

impl DocumentStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn load_items(&self) -> Vec<Item> {
        self.load(StorageKey::Items).unwrap_or_default()
    }

    pub fn save_items(&self, items: &[Item]) -> Result<(), StorageError> {
        self.save(StorageKey::Items, &items)
    }

    pub fn load_gift_cards(&self) -> Vec<GiftCard> {
        self.load(StorageKey::GiftCards).unwrap_or_default()
    }

    pub fn save_gift_cards(&self, gift_cards: &[GiftCard]) -> Result<(), StorageError> {
        self.save(StorageKey::GiftCards, &gift_cards)
    }

    /// Custom categories only; the defaults are never persisted
    pub fn load_categories(&self) -> Vec<String> {
        self.load(StorageKey::Categories).unwrap_or_default()
    }

    pub fn save_categories(&self, categories: &[String]) -> Result<(), StorageError> {
        self.save(StorageKey::Categories, &categories)
    }

    /// Last time local data was known to match a snapshot.
    ///
    /// A stored value that is not a valid RFC 3339 instant counts as absent.
    pub fn load_last_sync(&self) -> Option<DateTime<Utc>> {
        let raw: String = self.load(StorageKey::LastSync)?;
        match DateTime::parse_from_rfc3339(&raw) {
            Ok(timestamp) => Some(timestamp.with_timezone(&Utc)),
            Err(e) => {
                warn!("Ignoring malformed last-sync timestamp '{}': {}", raw, e);
                None
            }
        }
    }

    pub fn save_last_sync(&self, timestamp: &DateTime<Utc>) -> Result<(), StorageError> {
        self.save(StorageKey::LastSync, &format_timestamp(timestamp))
    }

    fn load<T: DeserializeOwned>(&self, key: StorageKey) -> Option<T> {
        let raw = match self.store.get(key.as_str()) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No stored document for '{}'", key.as_str());
                return None;
            }
            Err(e) => {
                warn!("Failed to read '{}', treating as empty: {}", key.as_str(), e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Stored document '{}' is corrupt, treating as empty: {}", key.as_str(), e);
                None
            }
        }
    }

    fn save<T: Serialize + ?Sized>(&self, key: StorageKey, value: &T) -> Result<(), StorageError> {
        let result = serde_json::to_string(value)
            .map_err(StorageError::from)
            .and_then(|json| self.store.set(key.as_str(), &json));

        if let Err(e) = &result {
            error!("Error saving '{}' to storage: {}", key.as_str(), e);
        }
        result
    }
}

/// RFC 3339 in UTC with a `Z` suffix, e.g. `2024-01-01T00:00:00Z`
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}
