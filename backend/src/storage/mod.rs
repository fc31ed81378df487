//! # Storage Module
//!
//! Handles all data persistence for the wishlist.
//!
//! The layering, bottom up:
//!
//! - **traits**: the [`KeyValueStore`] contract (`get`/`set` of raw documents)
//! - **file_store** / **memory_store**: concrete backends
//! - **documents**: typed load/save of the four persisted documents under
//!   their fixed keys
//! - **context**: the process-wide [`StorageContext`] holding the in-memory
//!   collections that the domain services read and mutate
//!
//! Domain code never touches the raw keys; it goes through the context.

pub mod context;
pub mod documents;
pub mod file_store;
pub mod memory_store;
pub mod traits;

pub use context::{Collections, StorageContext, Stored};
pub use documents::{format_timestamp, DocumentStore, StorageKey};
pub use file_store::FileStore;
pub use memory_store::MemoryStore;
pub use traits::{KeyValueStore, StorageError};
