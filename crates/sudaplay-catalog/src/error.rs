use std::io;
use std::path::PathBuf;

use crate::model::{RecordId, UserId};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record {0} not found")]
    NotFound(RecordId),

    #[error("user {user} already rated record {record}")]
    DuplicateRating { record: RecordId, user: UserId },

    #[error("store lock poisoned")]
    Poisoned,

    #[error("store file is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),

    #[error(transparent)]
    Fs(#[from] sudaplay_fs::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Failure kinds of a publish attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PublishErrorKind {
    MissingFile,
    UnsupportedFormat,
    PathTraversal,
    ExtractionFailure,
    MissingEntryPage,
    Persist,
}

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("no file to process")]
    MissingFile,

    #[error("only ZIP accepted")]
    UnsupportedFormat { file: String },

    #[error("ZIP contains disallowed paths: {source}")]
    PathTraversal { source: sudaplay_archive::Error },

    #[error("could not extract ZIP: {source}")]
    ExtractionFailure { source: sudaplay_archive::Error },

    #[error("ZIP must contain an index.html file")]
    MissingEntryPage,

    #[error("could not save publish result: {0}")]
    Persist(#[from] StoreError),
}

impl PublishError {
    pub fn kind(&self) -> PublishErrorKind {
        match self {
            Self::MissingFile => PublishErrorKind::MissingFile,
            Self::UnsupportedFormat { .. } => PublishErrorKind::UnsupportedFormat,
            Self::PathTraversal { .. } => PublishErrorKind::PathTraversal,
            Self::ExtractionFailure { .. } => PublishErrorKind::ExtractionFailure,
            Self::MissingEntryPage => PublishErrorKind::MissingEntryPage,
            Self::Persist(_) => PublishErrorKind::Persist,
        }
    }
}

impl From<sudaplay_archive::Error> for PublishError {
    fn from(e: sudaplay_archive::Error) -> Self {
        if e.is_path_traversal() {
            Self::PathTraversal { source: e }
        } else {
            Self::ExtractionFailure { source: e }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("upload a file or provide an external link")]
    MissingContent,

    #[error("the file must be a .zip to be playable on the platform")]
    NotZip,

    #[error("the uploaded file is not a valid ZIP")]
    InvalidZip,

    #[error("the ZIP must include an index.html file")]
    MissingIndex,

    #[error("the file is {size} bytes, the limit is {limit} bytes")]
    TooLarge { size: u64, limit: u64 },

    #[error("{field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("could not read upload '{path}': {source}")]
    Unreadable { path: PathBuf, source: io::Error },

    #[error("could not store upload '{path}': {source}")]
    Storage { path: PathBuf, source: io::Error },

    #[error("could not publish the game: {0}")]
    Publish(#[source] PublishError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, thiserror::Error)]
pub enum PlayError {
    #[error("game {0} not found")]
    NotFound(RecordId),

    #[error("game {0} has no downloadable file")]
    NoArchive(RecordId),

    #[error("the file of game {id} is not available on the server: '{path}'")]
    FileMissing { id: RecordId, path: PathBuf },

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, thiserror::Error)]
pub enum RatingError {
    #[error("game {0} not found")]
    NotFound(RecordId),

    #[error("rating must be between 1 and 5, got {0}")]
    OutOfRange(i64),

    #[error("you already rated this game, only one rating per user is allowed")]
    AlreadyRated,

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for RatingError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateRating { .. } => Self::AlreadyRated,
            StoreError::NotFound(id) => Self::NotFound(id),
            other => Self::Store(other),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}
