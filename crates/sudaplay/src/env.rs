use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sudaplay_catalog::{CatalogConfig, JsonFileStore, MediaLayout, Publisher};

/// Everything a command needs: configuration, the record store and a
/// publisher bound to the media root.
pub struct SudaEnv {
    config: CatalogConfig,
    store: JsonFileStore,
    publisher: Publisher,
}

impl SudaEnv {
    pub fn new(config_path: Option<&Path>, media_root: Option<PathBuf>) -> Result<Self> {
        let mut config = CatalogConfig::load(config_path).context("Failed to load configuration")?;
        if let Some(root) = media_root {
            config.media_root = root;
        }

        let layout = config.layout();
        layout.ensure().with_context(|| {
            format!("Failed to create media directories in {}", layout.root().display())
        })?;

        let store_path = config.store_path();
        let store = JsonFileStore::open(&store_path)
            .with_context(|| format!("Failed to open catalog {}", store_path.display()))?;
        let publisher = Publisher::with_options(layout, config.extract_options());

        Ok(Self {
            config,
            store,
            publisher,
        })
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    pub fn store(&self) -> &JsonFileStore {
        &self.store
    }

    pub fn publisher(&self) -> &Publisher {
        &self.publisher
    }

    pub fn layout(&self) -> &MediaLayout {
        self.publisher.layout()
    }

    pub fn media_url(&self) -> &str {
        &self.config.media_url
    }
}
