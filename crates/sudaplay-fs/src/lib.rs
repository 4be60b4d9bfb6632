//! Filesystem primitives used by the SudaPlay publishing pipeline.
//!
//! - `primitives/` - atomic write, directory replacement, best-effort removal
//! - `workspace.rs` - staging directory that is either committed or removed

mod error;
mod primitives;
mod workspace;

pub use error::{Error, Result};
pub use primitives::{
    Durability, ReplaceDirOptions, atomic_read, atomic_write, remove_dir_best_effort,
    remove_file_best_effort, replace_dir,
};
pub use workspace::Workspace;
