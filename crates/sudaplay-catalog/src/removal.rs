use sudaplay_fs::{remove_dir_best_effort, remove_file_best_effort};
use tracing::{info, warn};

use crate::error::StoreResult;
use crate::layout::MediaLayout;
use crate::model::{ContentRecord, RecordId};
use crate::store::RecordStore;

/// Delete a record, its ratings, its uploaded archive and its build.
///
/// File removal is best-effort; a leftover file is logged, not returned as an
/// error. Returns `None` when the record did not exist.
pub fn remove_record<S: RecordStore + ?Sized>(
    store: &S,
    layout: &MediaLayout,
    id: RecordId,
) -> StoreResult<Option<ContentRecord>> {
    let Some(record) = store.delete(id)? else {
        return Ok(None);
    };

    if let Some(archive) = &record.archive_file
        && !remove_file_best_effort(&archive.path)
    {
        warn!(record = %id, path = %archive.path.display(), "archive file left behind");
    }

    let build_dir = layout.build_dir(id);
    if !remove_dir_best_effort(&build_dir) {
        warn!(record = %id, path = %build_dir.display(), "build directory left behind");
    }

    info!(record = %id, title = %record.title, "record removed");
    Ok(Some(record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Genre, NewRecord, StoredFile, UserId};
    use crate::store::MemoryStore;
    use tempfile::tempdir;

    #[test]
    fn removes_files_and_record() {
        let dir = tempdir().unwrap();
        let layout = MediaLayout::new(dir.path());
        layout.ensure().unwrap();
        let archive = layout.files().join("a-game.zip");
        std::fs::write(&archive, b"PK").unwrap();

        let store = MemoryStore::new();
        let record = store
            .insert(NewRecord {
                title: "Game".into(),
                short_description: String::new(),
                description: "d".into(),
                genre: Genre::Otro,
                cover_image: None,
                archive_file: Some(StoredFile {
                    name: "games/files/a-game.zip".into(),
                    path: archive.clone(),
                }),
                external_url: None,
                is_approved: true,
                is_featured: false,
                uploaded_by: UserId(1),
            })
            .unwrap();
        let build = layout.build_dir(record.id);
        std::fs::create_dir_all(&build).unwrap();
        std::fs::write(build.join("index.html"), "<html>").unwrap();

        let removed = remove_record(&store, &layout, record.id).unwrap();
        assert_eq!(removed.map(|r| r.id), Some(record.id));
        assert!(!archive.exists());
        assert!(!build.exists());
        assert!(store.get(record.id).unwrap().is_none());

        assert!(remove_record(&store, &layout, record.id).unwrap().is_none());
    }
}
