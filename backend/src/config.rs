//! # Configuration
//!
//! Settings are resolved in three layers, later ones winning:
//!
//! 1. built-in defaults (data in `~/Documents/Wishlist`, no snapshot)
//! 2. `wishlist_config.yaml` inside the data directory, if present
//! 3. environment variables
//!
//! ## YAML Format
//!
//! ```yaml
//! snapshot_url: "https://example.com/wishlist-data.json"
//! snapshot_path: null
//! seed_sample_data: false
//! ```

use anyhow::Context;
use log::{debug, info};
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::io::{FileSnapshotSource, HttpSnapshotFetcher, NoSnapshot, SnapshotSource};

pub const CONFIG_FILE_NAME: &str = "wishlist_config.yaml";

pub const DATA_DIR_VAR: &str = "WISHLIST_DATA_DIR";
pub const SNAPSHOT_URL_VAR: &str = "WISHLIST_SNAPSHOT_URL";
pub const SNAPSHOT_PATH_VAR: &str = "WISHLIST_SNAPSHOT_PATH";
pub const SEED_SAMPLES_VAR: &str = "WISHLIST_SEED_SAMPLES";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid value '{value}' for {name}")]
    InvalidValue { name: String, value: String },
}

/// Contents of `wishlist_config.yaml`; every field is optional
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    snapshot_url: Option<String>,
    snapshot_path: Option<PathBuf>,
    seed_sample_data: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WishlistConfig {
    /// Where the persisted documents live
    pub data_directory: PathBuf,
    /// Published snapshot fetched over HTTP at startup
    pub snapshot_url: Option<String>,
    /// Snapshot read from disk; used only when no URL is set
    pub snapshot_path: Option<PathBuf>,
    /// Add demo items when the wishlist is empty
    pub seed_sample_data: bool,
}

impl WishlistConfig {
    /// Defaults only, rooted at `data_directory`
    pub fn new<P: AsRef<Path>>(data_directory: P) -> Self {
        Self {
            data_directory: data_directory.as_ref().to_path_buf(),
            snapshot_url: None,
            snapshot_path: None,
            seed_sample_data: false,
        }
    }

    /// Resolve configuration from the process environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(|name| std::env::var(name).ok())
    }

    /// Resolve configuration using `lookup` for environment variables.
    ///
    /// Empty variables count as unset.
    pub fn load_with(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let data_directory = var(DATA_DIR_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| default_data_directory(&var));

        let mut config = Self::new(&data_directory);

        if let Some(file) = read_config_file(&data_directory.join(CONFIG_FILE_NAME))? {
            config.snapshot_url = file.snapshot_url;
            config.snapshot_path = file.snapshot_path;
            config.seed_sample_data = file.seed_sample_data.unwrap_or(false);
        }

        if let Some(url) = var(SNAPSHOT_URL_VAR) {
            config.snapshot_url = Some(url);
        }
        if let Some(path) = var(SNAPSHOT_PATH_VAR) {
            config.snapshot_path = Some(PathBuf::from(path));
        }
        if let Some(raw) = var(SEED_SAMPLES_VAR) {
            config.seed_sample_data = parse_flag(SEED_SAMPLES_VAR, &raw)?;
        }

        info!("Using data directory {:?}", config.data_directory);
        Ok(config)
    }

    /// The snapshot source selected by this configuration: URL, then file, then none
    pub fn snapshot_source(&self) -> anyhow::Result<Box<dyn SnapshotSource>> {
        if let Some(url) = &self.snapshot_url {
            let fetcher = HttpSnapshotFetcher::new(url.as_str())
                .with_context(|| format!("Failed to build HTTP client for {}", url))?;
            return Ok(Box::new(fetcher));
        }
        if let Some(path) = &self.snapshot_path {
            return Ok(Box::new(FileSnapshotSource::new(path)));
        }
        Ok(Box::new(NoSnapshot))
    }
}

fn default_data_directory(var: &impl Fn(&str) -> Option<String>) -> PathBuf {
    let home = var("HOME").or_else(|| var("USERPROFILE"));
    match home {
        Some(home) => PathBuf::from(home).join("Documents").join("Wishlist"),
        None => PathBuf::from("Wishlist"),
    }
}

fn read_config_file(path: &Path) -> Result<Option<FileConfig>, ConfigError> {
    let yaml_content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("No config file at {:?}", path);
            return Ok(None);
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let config = serde_yaml::from_str(&yaml_content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Loaded config file {:?}", path);
    Ok(Some(config))
}

fn parse_flag(name: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            name: name.to_string(),
            value: raw.to_string(),
        }),
    }
}
