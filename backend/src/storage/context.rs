//! # Storage Context
//!
//! The single storage handle of a process. It is built once at start-up,
//! loads every persisted document into memory, and is then cloned into each
//! service. All clones share the same in-memory collections.
//!
//! Every mutation runs under one lock: the change is computed, committed to
//! memory, then written through to the backend. A failed write is reported in
//! the returned [`Stored`] value while the in-memory change stays in effect
//! for the rest of the session.

use chrono::{DateTime, Utc};
use log::info;
use shared::{GiftCard, Item};
use std::convert::Infallible;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::documents::DocumentStore;
use super::traits::{KeyValueStore, StorageError};

/// In-memory copy of the persisted documents
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collections {
    pub items: Vec<Item>,
    pub gift_cards: Vec<GiftCard>,
    pub custom_categories: Vec<String>,
    pub last_sync: Option<DateTime<Utc>>,
}

/// Result of a mutating operation together with its persistence status
#[derive(Debug)]
pub struct Stored<T> {
    pub value: T,
    pub persisted: Result<(), StorageError>,
}

impl<T> Stored<T> {
    pub fn new(value: T, persisted: Result<(), StorageError>) -> Self {
        Self { value, persisted }
    }

    /// Whether the change reached durable storage
    pub fn is_persisted(&self) -> bool {
        self.persisted.is_ok()
    }

    pub fn into_value(self) -> T {
        self.value
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Stored<U> {
        Stored {
            value: f(self.value),
            persisted: self.persisted,
        }
    }
}

/// Shared handle over the document store and the in-memory collections
#[derive(Clone)]
pub struct StorageContext {
    documents: DocumentStore,
    state: Arc<Mutex<Collections>>,
}

impl StorageContext {
    /// Load every document from `store` and build the shared handle
    pub fn open(store: Arc<dyn KeyValueStore>) -> Self {
        let documents = DocumentStore::new(store);
        let collections = Collections {
            items: documents.load_items(),
            gift_cards: documents.load_gift_cards(),
            custom_categories: documents.load_categories(),
            last_sync: documents.load_last_sync(),
        };

        info!(
            "Loaded {} items, {} gift cards, {} custom categories (last sync: {:?})",
            collections.items.len(),
            collections.gift_cards.len(),
            collections.custom_categories.len(),
            collections.last_sync
        );

        Self {
            documents,
            state: Arc::new(Mutex::new(collections)),
        }
    }

    /// Run a read-only closure against the current collections
    pub fn read<R>(&self, f: impl FnOnce(&Collections) -> R) -> R {
        f(&self.lock())
    }

    /// Apply an unconditional change to the item collection and persist it
    pub fn update_items<R>(&self, f: impl FnOnce(&mut Vec<Item>) -> R) -> Stored<R> {
        let mut state = self.lock();
        let value = f(&mut state.items);
        let persisted = self.documents.save_items(&state.items);
        Stored::new(value, persisted)
    }

    /// Mutate the item collection and persist it.
    ///
    /// `f` returns `None` to signal that nothing was changed (e.g. unknown
    /// id); in that case nothing is written. `f` must not leave partial edits
    /// behind when it returns `None`.
    pub fn modify_items<R>(&self, f: impl FnOnce(&mut Vec<Item>) -> Option<R>) -> Option<Stored<R>> {
        let mut state = self.lock();
        let value = f(&mut state.items)?;
        let persisted = self.documents.save_items(&state.items);
        Some(Stored::new(value, persisted))
    }

    /// Apply an unconditional change to the gift card collection and persist it
    pub fn update_gift_cards<R>(&self, f: impl FnOnce(&mut Vec<GiftCard>) -> R) -> Stored<R> {
        let mut state = self.lock();
        let value = f(&mut state.gift_cards);
        let persisted = self.documents.save_gift_cards(&state.gift_cards);
        Stored::new(value, persisted)
    }

    /// Mutate the gift card collection and persist it
    pub fn modify_gift_cards<R>(
        &self,
        f: impl FnOnce(&mut Vec<GiftCard>) -> Option<R>,
    ) -> Option<Stored<R>> {
        let mut state = self.lock();
        let value = f(&mut state.gift_cards)?;
        let persisted = self.documents.save_gift_cards(&state.gift_cards);
        Some(Stored::new(value, persisted))
    }

    /// Mutate the custom category list and persist it
    pub fn modify_categories<R>(
        &self,
        f: impl FnOnce(&Collections, &mut Vec<String>) -> Option<R>,
    ) -> Option<Stored<R>> {
        let mut state = self.lock();
        let mut categories = state.custom_categories.clone();
        let value = f(&state, &mut categories)?;
        state.custom_categories = categories;
        let persisted = self.documents.save_categories(&state.custom_categories);
        Some(Stored::new(value, persisted))
    }

    /// Record a new sync checkpoint
    pub fn set_last_sync(&self, timestamp: DateTime<Utc>) -> Stored<DateTime<Utc>> {
        let mut state = self.lock();
        state.last_sync = Some(timestamp);
        let persisted = self.documents.save_last_sync(&timestamp);
        Stored::new(timestamp, persisted)
    }

    /// Replace the whole item collection and move the sync checkpoint
    pub fn replace_items(&self, items: Vec<Item>, synced_at: DateTime<Utc>) -> Stored<usize> {
        match self.replace_items_with(|_| Ok::<_, Infallible>((items, synced_at))) {
            Ok(stored) => stored.map(|(count, _)| count),
            Err(never) => match never {},
        }
    }

    /// Decide on a replacement from the current collections and apply it
    /// under the same lock.
    ///
    /// `f` returns the new items with their checkpoint, or `Err` to leave
    /// everything untouched. The result carries the item count and checkpoint. The checkpoint is persisted only after the items
    /// were, so a failed items write never leaves a newer checkpoint on disk
    /// next to the older items.
    pub fn replace_items_with<E>(
        &self,
        f: impl FnOnce(&Collections) -> Result<(Vec<Item>, DateTime<Utc>), E>,
    ) -> Result<Stored<(usize, DateTime<Utc>)>, E> {
        let mut state = self.lock();
        let (items, synced_at) = f(&state)?;
        let count = items.len();
        state.items = items;
        state.last_sync = Some(synced_at);

        let persisted = self
            .documents
            .save_items(&state.items)
            .and_then(|()| self.documents.save_last_sync(&synced_at));
        Ok(Stored::new((count, synced_at), persisted))
    }

    fn lock(&self) -> MutexGuard<'_, Collections> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
