//! Backup export and import of the item collection.
//!
//! Import is all-or-nothing: the document is fully validated before the
//! collection is replaced.

use chrono::{DateTime, Utc};
use log::{info, warn};
use serde_json::Value;
use shared::{ExportDocument, Item, EXPORT_FORMAT_VERSION};
use thiserror::Error;

use crate::storage::{format_timestamp, StorageContext, Stored};

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Import document has no items")]
    MissingItems,

    #[error("Import document items is not a list")]
    ItemsNotAList,

    #[error("Import document is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("Item {index} in import document is invalid: {source}")]
    InvalidItem {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Clone)]
pub struct ExportService {
    context: StorageContext,
}

impl ExportService {
    pub fn new(context: StorageContext) -> Self {
        Self { context }
    }

    /// Snapshot the current items and mark local data as synced at export time
    pub fn export_data(&self) -> Stored<ExportDocument> {
        let now = Utc::now();
        let items = self.context.read(|c| c.items.clone());
        let document = ExportDocument {
            version: EXPORT_FORMAT_VERSION.to_string(),
            export_date: format_timestamp(&now),
            items,
        };

        info!("Exported {} items", document.items.len());
        self.context.set_last_sync(now).map(|_| document)
    }

    /// Pretty-printed JSON, as written to a backup file
    pub fn render(document: &ExportDocument) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(document)
    }

    /// Suggested file name for a backup taken on `date`
    pub fn backup_file_name(date: &DateTime<Utc>) -> String {
        format!("wishlist-backup-{}.json", date.format("%Y-%m-%d"))
    }

    /// Parse and import a backup file's text
    pub fn import_json(&self, raw: &str) -> Result<Stored<usize>, ImportError> {
        let value: Value = serde_json::from_str(raw).map_err(ImportError::InvalidJson)?;
        self.import_data(&value)
    }

    /// Replace all items with the ones in `document`.
    ///
    /// The sync checkpoint moves to the document's `exportDate` when it is a
    /// valid timestamp, otherwise to now. Nothing changes on error.
    pub fn import_data(&self, document: &Value) -> Result<Stored<usize>, ImportError> {
        let items = parse_items(document)?;
        let synced_at = document
            .get("exportDate")
            .and_then(Value::as_str)
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|timestamp| timestamp.with_timezone(&Utc))
            .unwrap_or_else(Utc::now);

        let stored = self.context.replace_items(items, synced_at);
        if let Err(e) = &stored.persisted {
            warn!("Imported items could not be persisted: {}", e);
        }
        info!("Imported {} items", stored.value);
        Ok(stored)
    }
}

fn parse_items(document: &Value) -> Result<Vec<Item>, ImportError> {
    let raw_items = match document.get("items") {
        None | Some(Value::Null) => return Err(ImportError::MissingItems),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(ImportError::ItemsNotAList),
    };

    raw_items
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            let mut item: Item = serde_json::from_value(raw.clone())
                .map_err(|source| ImportError::InvalidItem { index, source })?;
            item.ensure_variant();
            Ok(item)
        })
        .collect()
}
