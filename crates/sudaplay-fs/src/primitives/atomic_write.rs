use crate::primitives::remove::remove_file_best_effort;
use crate::{Error, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Whether [`atomic_write`] flushes the new content to disk before the rename.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Durability {
    #[default]
    Buffered,
    Synced,
}

/// Replace `path` with `content` through a temporary sibling and a rename.
///
/// Readers see either the old file or the complete new one. On any error the
/// temporary file is removed and `path` is left as it was.
pub fn atomic_write(path: impl AsRef<Path>, content: &[u8], durability: Durability) -> Result<()> {
    let path = path.as_ref();
    let parent = path
        .parent()
        .ok_or_else(|| Error::NoParent(path.to_path_buf()))?;
    let tmp_path = parent.join(format!(".tmp.{}.sudaplay", uuid::Uuid::new_v4()));

    let result = write_temp(&tmp_path, content, durability).and_then(|()| {
        fs::rename(&tmp_path, path).map_err(|e| Error::Write {
            path: path.to_path_buf(),
            source: e,
        })
    });
    if result.is_err() {
        remove_file_best_effort(&tmp_path);
    }
    result
}

fn write_temp(tmp_path: &Path, content: &[u8], durability: Durability) -> Result<()> {
    let failed = |source| Error::Write {
        path: tmp_path.to_path_buf(),
        source,
    };
    let mut file = File::create(tmp_path).map_err(failed)?;
    file.write_all(content).map_err(failed)?;
    if durability == Durability::Synced {
        file.sync_all().map_err(failed)?;
    }
    Ok(())
}

pub fn atomic_read(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::NotFound(path.to_path_buf()),
        _ => Error::Read {
            path: path.to_path_buf(),
            source: e,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn names_in(dir: &Path) -> Vec<std::ffi::OsString> {
        fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect()
    }

    #[test]
    fn test_atomic_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        atomic_write(&path, b"{}", Durability::default()).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"{}");
    }

    #[test]
    fn test_atomic_write_leaves_no_temp_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        atomic_write(&path, b"one", Durability::Synced).unwrap();
        atomic_write(&path, b"two", Durability::Buffered).unwrap();

        assert_eq!(names_in(dir.path()), vec![std::ffi::OsString::from("catalog.json")]);
        assert_eq!(fs::read(&path).unwrap(), b"two");
    }

    #[test]
    fn test_failed_rename_removes_temp_file() {
        let dir = tempdir().unwrap();
        // a non-empty directory cannot be replaced by a file
        let path = dir.path().join("catalog.json");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "x").unwrap();

        let result = atomic_write(&path, b"{}", Durability::Synced);
        assert!(matches!(result, Err(Error::Write { .. })));
        assert_eq!(names_in(dir.path()), vec![std::ffi::OsString::from("catalog.json")]);
        assert!(path.join("keep").is_file());
    }

    #[test]
    fn test_atomic_read_missing() {
        let dir = tempdir().unwrap();
        let result = atomic_read(dir.path().join("missing"));
        assert!(matches!(result, Err(Error::NotFound(_))));
    }
}
