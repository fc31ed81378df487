//! # Wishlist Backend
//!
//! Local-first storage and synchronization for the wishlist app. The UI layer
//! talks to the services on [`Backend`]; it never touches storage keys.
//!
//! On startup the host loads [`config::WishlistConfig`], opens the backend
//! and runs [`domain::SyncService::reconcile`] once to pick up a newer
//! published snapshot. Everything after that is local.

use anyhow::{Context, Result};
use std::sync::Arc;

pub mod config;
pub mod domain;
pub mod io;
pub mod logging;
pub mod storage;

#[cfg(test)]
pub mod test_utils;

pub use config::WishlistConfig;
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageContext, StorageError, Stored};

use domain::{
    CategoryService, ExportService, GiftCardService, ItemService, StatsService, SyncService,
};

/// All services over one shared storage context
#[derive(Clone)]
pub struct Backend {
    pub item_service: ItemService,
    pub gift_card_service: GiftCardService,
    pub category_service: CategoryService,
    pub stats_service: StatsService,
    pub sync_service: SyncService,
    pub export_service: ExportService,
}

impl Backend {
    /// Build every service over `store`
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let context = StorageContext::open(store);

        Backend {
            item_service: ItemService::new(context.clone()),
            gift_card_service: GiftCardService::new(context.clone()),
            category_service: CategoryService::new(context.clone()),
            stats_service: StatsService::new(context.clone()),
            sync_service: SyncService::new(context.clone()),
            export_service: ExportService::new(context),
        }
    }

    /// Open the file-backed store in the configured data directory
    pub fn open(config: &WishlistConfig) -> Result<Self> {
        let store = FileStore::new(&config.data_directory).with_context(|| {
            format!("Failed to open data directory {:?}", config.data_directory)
        })?;
        Ok(Self::new(Arc::new(store)))
    }
}
