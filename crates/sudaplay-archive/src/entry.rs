use std::path::{Path, PathBuf};

use crate::format::ArchiveFormat;

/// An archive entry as written to disk.
#[derive(Clone, Debug)]
pub struct Entry {
    pub original_name: String,
    /// Sanitized path below the extraction root.
    pub relative_path: PathBuf,
    pub target_path: PathBuf,
    pub size: u64,
    pub mode: Option<u32>,
    pub kind: EntryKind,
    pub hash: Option<String>,
}

impl Entry {
    pub fn new(original_name: impl Into<String>, relative_path: PathBuf, kind: EntryKind) -> Self {
        Self {
            original_name: original_name.into(),
            relative_path,
            target_path: PathBuf::new(),
            size: 0,
            mode: None,
            kind,
            hash: None,
        }
    }

    pub fn with_target_path(mut self, target_path: PathBuf) -> Self {
        self.target_path = target_path;
        self
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    pub fn with_mode(mut self, mode: Option<u32>) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_hash(mut self, hash: String) -> Self {
        self.hash = Some(hash);
        self
    }

    pub fn is_file(&self) -> bool {
        matches!(self.kind, EntryKind::File)
    }
}

/// Symlink entries are materialized as regular files holding the link
/// target, so there is no link variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

#[derive(Clone, Debug)]
pub struct ArchiveReport {
    pub format: ArchiveFormat,
    pub root: PathBuf,
    pub entry_count: usize,
    pub total_bytes: u64,
    pub entries: Vec<Entry>,
}

impl ArchiveReport {
    pub fn files(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(|e| e.is_file())
    }

    /// Re-anchor every target path after the extraction root was moved.
    pub fn relocate(mut self, new_root: &Path) -> Self {
        for entry in &mut self.entries {
            entry.target_path = new_root.join(&entry.relative_path);
        }
        self.root = new_root.to_path_buf();
        self
    }
}

/// Entry names and declared sizes, read without extracting anything.
#[derive(Clone, Debug)]
pub struct ArchiveListing {
    pub format: ArchiveFormat,
    pub names: Vec<String>,
    pub declared_bytes: u64,
}

impl ArchiveListing {
    /// Case-insensitive suffix match over the raw entry names.
    pub fn contains_name_ending_with(&self, suffix: &str) -> bool {
        let suffix = suffix.to_lowercase();
        self.names
            .iter()
            .any(|name| name.to_lowercase().ends_with(&suffix))
    }
}
