use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("path not found: '{0}'")]
    NotFound(PathBuf),

    #[error("path has no parent directory: '{0}'")]
    NoParent(PathBuf),

    #[error("failed to read '{path}': {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write '{path}': {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to create directory '{path}': {source}")]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("failed to replace directory '{path}': {source}")]
    ReplaceDir { path: PathBuf, source: io::Error },
}

pub type Result<T> = std::result::Result<T, Error>;
