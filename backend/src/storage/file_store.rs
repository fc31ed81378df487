//! # File Store
//!
//! Durable key-value storage backed by one JSON file per key inside a data
//! directory.
//!
//! ## File Structure
//!
//! ```text
//! data/
//! ├── wishlist_config.yaml     (optional, see config module)
//! ├── wishlist-data.json
//! ├── gift-cards-data.json
//! ├── wishlist-categories.json
//! └── wishlist-last-sync.json
//! ```
//!
//! Writes use the temp-file-then-rename pattern so a crash mid-write leaves
//! the previous document intact.

use log::{debug, info};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::traits::{KeyValueStore, StorageError};

/// Key-value store that keeps each key in `<base_directory>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileStore {
    base_directory: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `base_directory`, creating the directory if needed
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self, StorageError> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
            info!("Created data directory: {:?}", base_path);
        }

        Ok(Self {
            base_directory: base_path,
        })
    }

    /// Directory holding the documents
    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.base_directory.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;

        match fs::read_to_string(&path) {
            Ok(contents) => {
                debug!("Read {} bytes from {:?}", contents.len(), path);
                Ok(Some(contents))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;

        if !self.base_directory.exists() {
            fs::create_dir_all(&self.base_directory)?;
        }

        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, value)?;
        fs::rename(&temp_path, &path)?;

        debug!("Saved {} bytes to {:?}", value.len(), path);
        Ok(())
    }
}
