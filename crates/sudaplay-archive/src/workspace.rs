use std::io::{Read, Seek};
use std::path::Path;

use sudaplay_fs::Workspace;

use crate::entry::ArchiveReport;
use crate::error::Result;
use crate::extract::extract_from_reader;
use crate::options::ExtractOptions;

/// An archive extracted into a staging directory that has not been moved to
/// its destination yet. Dropping it removes the staging directory.
pub struct WorkspaceExtraction {
    workspace: Workspace,
    report: ArchiveReport,
}

impl WorkspaceExtraction {
    /// Move the staged tree to the destination and return the report with
    /// target paths pointing at the destination.
    pub fn commit(self) -> Result<ArchiveReport> {
        let destination = self.workspace.commit()?;
        Ok(self.report.relocate(&destination))
    }

    pub fn abort(self) {
        drop(self.workspace);
    }

    pub fn staging_path(&self) -> &Path {
        &self.report.root
    }
}

/// Extract into a staging directory next to `destination`.
///
/// On error the staging directory is already gone and `destination` has not
/// been touched.
pub fn extract_to_workspace<R: Read + Seek>(
    reader: R,
    destination: &Path,
    options: &ExtractOptions,
) -> Result<WorkspaceExtraction> {
    let workspace = Workspace::beside(destination)?;
    let report = extract_from_reader(reader, workspace.path(), options)?;
    Ok(WorkspaceExtraction { workspace, report })
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn extract_to_workspace_invalid_format_cleans_up() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dest = temp_dir.path().join("dest");

        let result = extract_to_workspace(
            Cursor::new([0xDE, 0xAD, 0xBE, 0xEF]),
            &dest,
            &ExtractOptions::default(),
        );
        assert!(result.is_err());
        assert!(!dest.exists());
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }
}
