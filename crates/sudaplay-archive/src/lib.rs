//! ZIP extraction with path sanitization and staged commit.
//!
//! # Architecture
//!
//! - `format.rs` - Format detection
//! - `sanitize.rs` - Entry name sanitization (zip-slip prevention)
//! - `extract/` - Validate-then-extract pipeline over ZIP entries
//! - `workspace.rs` - Extraction into a staging directory beside the destination
//! - `options.rs` - Limits, hashing and progress reporting
//! - `entry.rs` - Report types

pub use entry::{ArchiveListing, ArchiveReport, Entry, EntryKind};
pub use error::{Error, Result};
pub use extract::{extract_from_reader, list_from_reader};
pub use format::ArchiveFormat;
pub use options::{ExtractOptions, HashStrategy, Progress};
pub use sanitize::{SanitizedPath, sanitize_entry_name};
pub use workspace::{WorkspaceExtraction, extract_to_workspace};

pub mod entry;
mod error;
pub mod extract;
pub mod format;
pub mod options;
mod sanitize;
mod workspace;
