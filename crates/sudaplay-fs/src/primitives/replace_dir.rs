use crate::{Error, Result};
use std::path::Path;
use std::time::Duration;

#[derive(Clone, Copy, Debug)]
pub struct ReplaceDirOptions {
    pub retry_count: u32,
    pub retry_delay: Duration,
}

impl Default for ReplaceDirOptions {
    fn default() -> Self {
        Self {
            retry_count: 5,
            retry_delay: Duration::from_millis(100),
        }
    }
}

/// Move `src` into place at `dest`, removing whatever `dest` held before.
///
/// `src` and `dest` must live on the same filesystem; the final step is a
/// single rename.
pub fn replace_dir(
    src: impl AsRef<Path>,
    dest: impl AsRef<Path>,
    options: ReplaceDirOptions,
) -> Result<()> {
    let src = src.as_ref();
    let dest = dest.as_ref();

    if !src.exists() {
        return Err(Error::NotFound(src.to_path_buf()));
    }

    let attempts = options.retry_count.max(1);
    let mut attempt = 0;
    loop {
        attempt += 1;

        if dest.exists()
            && let Err(e) = std::fs::remove_dir_all(dest)
        {
            if attempt >= attempts {
                return Err(Error::ReplaceDir {
                    path: dest.to_path_buf(),
                    source: e,
                });
            }
            std::thread::sleep(options.retry_delay * attempt);
            continue;
        }

        match std::fs::rename(src, dest) {
            Ok(()) => return Ok(()),
            Err(e) => {
                if attempt >= attempts {
                    return Err(Error::ReplaceDir {
                        path: dest.to_path_buf(),
                        source: e,
                    });
                }
                std::thread::sleep(options.retry_delay * attempt);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_replace_dir() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        let dest = dir.path().join("dest");
        std::fs::create_dir_all(&src).unwrap();
        std::fs::write(src.join("file.txt"), "data").unwrap();

        replace_dir(&src, &dest, ReplaceDirOptions::default()).unwrap();
        assert!(dest.join("file.txt").exists());
        assert!(!src.exists());
    }

    #[test]
    fn test_replace_dir_drops_previous_content() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        let dest = dir.path().join("dest");
        std::fs::create_dir_all(&src).unwrap();
        std::fs::create_dir_all(dest.join("old")).unwrap();
        std::fs::write(dest.join("old/stale.js"), "x").unwrap();
        std::fs::write(src.join("index.html"), "<html>").unwrap();

        replace_dir(&src, &dest, ReplaceDirOptions::default()).unwrap();
        assert!(dest.join("index.html").exists());
        assert!(!dest.join("old").exists());
    }

    #[test]
    fn test_replace_dir_missing_source() {
        let dir = tempdir().unwrap();
        let result = replace_dir(
            dir.path().join("missing"),
            dir.path().join("dest"),
            ReplaceDirOptions {
                retry_count: 1,
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(Error::NotFound(_))));
    }
}
