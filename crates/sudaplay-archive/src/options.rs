use std::path::PathBuf;
use std::sync::Arc;

use sha2::{Digest, Sha256};

/// Extraction settings.
///
/// Limits are checked against the sizes declared by the archive before any
/// file is written, and again against the bytes actually decompressed.
#[derive(Clone, Default)]
pub struct ExtractOptions {
    pub hash_strategy: HashStrategy,
    pub max_entries: Option<usize>,
    pub max_entry_bytes: Option<u64>,
    pub max_total_bytes: Option<u64>,
    pub on_progress: Option<Arc<dyn Fn(Progress) + Send + Sync>>,
}

#[derive(Clone, Debug)]
pub struct Progress {
    pub bytes_processed: u64,
    pub total_bytes: Option<u64>,
    pub current_file: Option<PathBuf>,
}

impl ExtractOptions {
    pub fn hash_strategy(mut self, strategy: HashStrategy) -> Self {
        self.hash_strategy = strategy;
        self
    }

    pub fn max_entries(mut self, n: usize) -> Self {
        self.max_entries = Some(n);
        self
    }

    pub fn max_entry_bytes(mut self, bytes: u64) -> Self {
        self.max_entry_bytes = Some(bytes);
        self
    }

    pub fn max_total_bytes(mut self, bytes: u64) -> Self {
        self.max_total_bytes = Some(bytes);
        self
    }

    pub fn on_progress(mut self, callback: Arc<dyn Fn(Progress) + Send + Sync>) -> Self {
        self.on_progress = Some(callback);
        self
    }

    pub(crate) fn report_progress(&self, progress: Progress) {
        if let Some(ref callback) = self.on_progress {
            callback(progress);
        }
    }
}

impl std::fmt::Debug for ExtractOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractOptions")
            .field("hash_strategy", &self.hash_strategy)
            .field("max_entries", &self.max_entries)
            .field("max_entry_bytes", &self.max_entry_bytes)
            .field("max_total_bytes", &self.max_total_bytes)
            .field("on_progress", &self.on_progress.is_some())
            .finish()
    }
}

/// Hash computation strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum HashStrategy {
    #[default]
    None,
    Sha256,
}

impl HashStrategy {
    pub(crate) fn hasher(self) -> Option<EntryHasher> {
        match self {
            Self::None => None,
            Self::Sha256 => Some(EntryHasher(Sha256::new())),
        }
    }
}

pub(crate) struct EntryHasher(Sha256);

impl EntryHasher {
    pub(crate) fn update(&mut self, bytes: &[u8]) {
        self.0.update(bytes);
    }

    pub(crate) fn finish(self) -> String {
        hex::encode(self.0.finalize())
    }
}
