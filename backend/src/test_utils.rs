//! Shared fixtures for unit tests.

use chrono::{DateTime, Utc};
use shared::{Item, Priority, Variant};
use std::sync::Arc;

use crate::storage::{DocumentStore, MemoryStore, StorageContext};

/// A memory-backed storage context, kept alongside its store so tests can
/// inspect raw documents, simulate write failures and reopen.
pub struct TestEnvironment {
    pub store: Arc<MemoryStore>,
    pub context: StorageContext,
}

impl TestEnvironment {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let context = StorageContext::open(store.clone());
        Self { store, context }
    }

    /// Start from persisted `items` and sync checkpoint
    pub fn with_items(items: Vec<Item>, last_sync: Option<DateTime<Utc>>) -> Self {
        let store = Arc::new(MemoryStore::new());
        let documents = DocumentStore::new(store.clone());
        documents.save_items(&items).unwrap();
        if let Some(timestamp) = last_sync {
            documents.save_last_sync(&timestamp).unwrap();
        }

        let context = StorageContext::open(store.clone());
        Self { store, context }
    }

    /// A fresh context loaded from what has been persisted so far
    pub fn reopen(&self) -> StorageContext {
        StorageContext::open(self.store.clone())
    }
}

pub fn item_fixture(id: &str, name: &str) -> Item {
    Item {
        id: id.to_string(),
        name: name.to_string(),
        category: "other".to_string(),
        priority: Priority::Medium,
        variants: vec![Variant::default()],
        date_added: "2024-01-01T00:00:00Z".to_string(),
        ..Default::default()
    }
}

pub fn timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw).unwrap().with_timezone(&Utc)
}
