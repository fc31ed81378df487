//! # Domain Services
//!
//! Business rules for the wishlist. Every service is a cheap `Clone` over the
//! shared [`StorageContext`](crate::storage::StorageContext), so the UI layer
//! can hold as many handles as it likes.
//!
//! Reads return copies. Mutations return [`Stored`](crate::storage::Stored)
//! values and report unknown ids as `None`.

pub mod category_service;
pub mod commands;
pub mod export_service;
pub mod gift_card_service;
pub mod item_service;
pub mod models;
pub mod sample_data;
pub mod stats_service;
pub mod sync_service;

pub use category_service::CategoryService;
pub use export_service::{ExportService, ImportError};
pub use gift_card_service::GiftCardService;
pub use item_service::ItemService;
pub use stats_service::StatsService;
pub use sync_service::{decide, SkipReason, SyncDecision, SyncOutcome, SyncService};
