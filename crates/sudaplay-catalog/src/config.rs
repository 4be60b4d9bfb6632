//! Catalog configuration.
//!
//! ```toml
//! media_root = "/srv/sudaplay/media"
//! media_url = "/media/"
//!
//! [limits]
//! max_upload_bytes = 524288000
//! max_entries = 10000
//! ```

use std::env;
use std::path::{Path, PathBuf};

use home::home_dir;
use serde::{Deserialize, Serialize};
use sudaplay_archive::{ExtractOptions, HashStrategy};
use tracing::debug;

use crate::error::ConfigError;
use crate::layout::MediaLayout;

pub const MEDIA_ROOT_ENV: &str = "SUDAPLAY_MEDIA_ROOT";
const STORE_FILE: &str = "catalog.json";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub media_root: PathBuf,
    pub media_url: String,
    /// Defaults to `catalog.json` inside the media root.
    pub store_file: Option<PathBuf>,
    pub limits: LimitsConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    pub max_upload_bytes: u64,
    pub max_entries: usize,
    pub max_entry_bytes: u64,
    pub max_total_bytes: u64,
    /// Record a SHA-256 per extracted file.
    pub hash_entries: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        let media_root = home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".sudaplay")
            .join("media");
        Self {
            media_root,
            media_url: "/media/".to_string(),
            store_file: None,
            limits: LimitsConfig::default(),
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: 500 * 1024 * 1024,
            max_entries: 10_000,
            max_entry_bytes: 512 * 1024 * 1024,
            max_total_bytes: 2 * 1024 * 1024 * 1024,
            hash_entries: false,
        }
    }
}

impl CatalogConfig {
    /// Read `path` if given, then apply `SUDAPLAY_MEDIA_ROOT`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Some(root) = env::var_os(MEDIA_ROOT_ENV).filter(|v| !v.is_empty()) {
            config.media_root = PathBuf::from(root);
        }

        debug!(media_root = %config.media_root.display(), "configuration loaded");
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn layout(&self) -> MediaLayout {
        MediaLayout::new(&self.media_root)
    }

    pub fn store_path(&self) -> PathBuf {
        match &self.store_file {
            Some(file) if file.is_absolute() => file.clone(),
            Some(file) => self.media_root.join(file),
            None => self.media_root.join(STORE_FILE),
        }
    }

    pub fn extract_options(&self) -> ExtractOptions {
        let hash = if self.limits.hash_entries {
            HashStrategy::Sha256
        } else {
            HashStrategy::None
        };
        ExtractOptions::default()
            .hash_strategy(hash)
            .max_entries(self.limits.max_entries)
            .max_entry_bytes(self.limits.max_entry_bytes)
            .max_total_bytes(self.limits.max_total_bytes)
    }
}
