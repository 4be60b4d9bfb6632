//! Game catalog core: content records, the archive publisher and the
//! operations built around it.
//!
//! - `model.rs` - records, ids, ratings
//! - `layout.rs` - directory layout below the media root
//! - `store/` - record persistence (in-memory and JSON file)
//! - `publish.rs` - archive publisher
//! - `upload.rs` - upload validation and the upload handler
//! - `play.rs` - play targets, views and downloads
//! - `rating.rs` - one-vote-per-user ratings
//! - `removal.rs` - cascade removal of a record's files
//! - `config.rs` - media root, media URL and extraction limits

pub mod config;
pub mod entry_page;
mod error;
pub mod layout;
pub mod model;
pub mod play;
pub mod publish;
pub mod rating;
pub mod removal;
pub mod store;
pub mod upload;

pub use config::{CatalogConfig, LimitsConfig};
pub use error::{
    ConfigError, PlayError, PublishError, PublishErrorKind, RatingError, StoreError, StoreResult,
    UploadError,
};
pub use layout::MediaLayout;
pub use model::{
    ContentRecord, GameRating, Genre, NewRecord, PublishFields, Rating, RecordId, StoredFile,
    UserId,
};
pub use play::{Download, GameDetail, PlaySession, PlayTarget};
pub use publish::{BuiltFile, PublishStatus, PublishedBuild, Publisher};
pub use rating::{RatingOutcome, rate};
pub use removal::remove_record;
pub use store::{Counter, JsonFileStore, MemoryStore, RecordStore};
pub use upload::{ArchiveUpload, NewGame, UploadHandler};
