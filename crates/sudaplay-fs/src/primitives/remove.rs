use std::path::Path;

/// Remove a directory tree, ignoring every error.
///
/// Returns whether the directory is gone afterwards.
pub fn remove_dir_best_effort(path: impl AsRef<Path>) -> bool {
    let path = path.as_ref();
    if path.exists() {
        let _ = std::fs::remove_dir_all(path);
    }
    !path.exists()
}

pub fn remove_file_best_effort(path: impl AsRef<Path>) -> bool {
    let path = path.as_ref();
    if path.exists() {
        let _ = std::fs::remove_file(path);
    }
    !path.exists()
}
