use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unsupported archive format")]
    UnsupportedFormat,

    #[error("zip-slip attack detected: entry '{entry}' resolves to '{resolved}'")]
    ZipSlip { entry: String, resolved: PathBuf },

    #[error("entry name is not a valid path: '{entry}'")]
    InvalidPath { entry: String },

    #[error("archive is corrupted: {0}")]
    Corrupted(String),

    #[error("archive has {count} entries, limit is {limit}")]
    TooManyEntries { count: usize, limit: usize },

    #[error("entry '{entry}' is {size} bytes, limit is {limit}")]
    EntryTooLarge { entry: String, size: u64, limit: u64 },

    #[error("archive expands to more than {limit} bytes")]
    ArchiveTooLarge { limit: u64 },

    #[error("failed to extract '{path}': {source}")]
    ExtractionFailed { path: PathBuf, source: io::Error },

    #[error("failed to create directory: {path}: {source}")]
    DirectoryCreationFailed { path: PathBuf, source: io::Error },

    #[error("workspace operation failed: {source}")]
    WorkspaceFailed { source: sudaplay_fs::Error },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// Whether the archive was rejected because an entry would land outside
    /// the extraction root.
    pub fn is_path_traversal(&self) -> bool {
        matches!(self, Self::ZipSlip { .. } | Self::InvalidPath { .. })
    }
}

impl From<sudaplay_fs::Error> for Error {
    fn from(e: sudaplay_fs::Error) -> Self {
        Self::WorkspaceFailed { source: e }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(e: zip::result::ZipError) -> Self {
        match e {
            zip::result::ZipError::Io(io) => Self::Io(io),
            other => Self::Corrupted(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
