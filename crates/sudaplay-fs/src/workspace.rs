use crate::{Error, Result, ReplaceDirOptions, replace_dir};
use std::path::{Path, PathBuf};

/// A staging directory bound to its final destination.
///
/// Content is written into [`Workspace::path`]; [`Workspace::commit`] moves it
/// to the destination. A workspace dropped without commit removes its staging
/// directory.
pub struct Workspace {
    staging_path: PathBuf,
    destination_path: PathBuf,
    committed: bool,
}

impl Workspace {
    pub fn new(staging_dir: impl AsRef<Path>, destination: impl AsRef<Path>) -> Result<Self> {
        let staging_path = staging_dir.as_ref().to_path_buf();
        let destination_path = destination.as_ref().to_path_buf();

        if !staging_path.exists() {
            std::fs::create_dir_all(&staging_path).map_err(|e| Error::CreateDir {
                path: staging_path.clone(),
                source: e,
            })?;
        }

        Ok(Self {
            staging_path,
            destination_path,
            committed: false,
        })
    }

    /// Stage next to `destination`, in the same parent directory, so that the
    /// commit is a rename on one filesystem.
    pub fn beside(destination: impl AsRef<Path>) -> Result<Self> {
        let destination = destination.as_ref();
        let parent = destination
            .parent()
            .ok_or_else(|| Error::NoParent(destination.to_path_buf()))?;
        let name = destination
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        std::fs::create_dir_all(parent).map_err(|e| Error::CreateDir {
            path: parent.to_path_buf(),
            source: e,
        })?;

        let staging = parent.join(format!(".{name}.staging-{}", uuid::Uuid::new_v4()));
        Self::new(staging, destination)
    }

    pub fn path(&self) -> &Path {
        &self.staging_path
    }

    pub fn commit(mut self) -> Result<PathBuf> {
        replace_dir(
            &self.staging_path,
            &self.destination_path,
            ReplaceDirOptions::default(),
        )?;
        self.committed = true;
        Ok(self.destination_path.clone())
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if !self.committed {
            let _ = std::fs::remove_dir_all(&self.staging_path);
        }
    }
}
