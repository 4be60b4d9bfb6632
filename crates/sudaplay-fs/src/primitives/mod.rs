pub mod atomic_write;
pub mod remove;
pub mod replace_dir;

pub use atomic_write::{Durability, atomic_read, atomic_write};
pub use remove::{remove_dir_best_effort, remove_file_best_effort};
pub use replace_dir::{ReplaceDirOptions, replace_dir};
