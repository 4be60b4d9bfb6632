//! Archive publisher.
//!
//! Turns a record's uploaded ZIP into a browsable build under
//! `<media root>/games/builds/<id>/` and records where its entry page lives.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use dashmap::DashMap;
use sudaplay_archive::{ExtractOptions, extract_to_workspace};
use sudaplay_fs::remove_dir_best_effort;
use tracing::{debug, info, info_span, warn};

use crate::entry_page::find_entry_page;
use crate::error::{PublishError, PublishErrorKind};
use crate::layout::MediaLayout;
use crate::model::{ContentRecord, PublishFields, RecordId};
use crate::store::RecordStore;

/// Outcome of a successful publish.
#[derive(Clone, Debug)]
pub struct PublishedBuild {
    /// Media-relative path of the entry page, e.g. `games/builds/42/index.html`.
    pub playable_path: String,
    pub build_dir: PathBuf,
    /// Entry page relative to `build_dir`.
    pub entry_page: PathBuf,
    pub file_count: usize,
    pub total_bytes: u64,
    /// Every extracted file, in archive order.
    pub files: Vec<BuiltFile>,
}

/// A file of a published build.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuiltFile {
    /// Path relative to the build directory.
    pub path: PathBuf,
    pub size: u64,
    /// Hex SHA-256 of the content, when the publisher hashes entries.
    pub sha256: Option<String>,
}

/// The `(success, message)` view of a publish attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublishStatus {
    pub success: bool,
    pub kind: Option<PublishErrorKind>,
    /// Empty on success.
    pub message: String,
}

impl From<&Result<PublishedBuild, PublishError>> for PublishStatus {
    fn from(result: &Result<PublishedBuild, PublishError>) -> Self {
        match result {
            Ok(_) => Self {
                success: true,
                kind: None,
                message: String::new(),
            },
            Err(e) => Self {
                success: false,
                kind: Some(e.kind()),
                message: e.to_string(),
            },
        }
    }
}

pub struct Publisher {
    layout: MediaLayout,
    options: ExtractOptions,
    locks: DashMap<RecordId, Arc<Mutex<()>>>,
}

impl Publisher {
    pub fn new(layout: MediaLayout) -> Self {
        Self::with_options(layout, ExtractOptions::default())
    }

    pub fn with_options(layout: MediaLayout, options: ExtractOptions) -> Self {
        Self {
            layout,
            options,
            locks: DashMap::new(),
        }
    }

    pub fn layout(&self) -> &MediaLayout {
        &self.layout
    }

    /// Extract the record's archive and point the record at its entry page.
    ///
    /// The build directory is wiped first and only refilled when the whole
    /// archive extracted cleanly and contains an `index.html`. The publish
    /// fields are written to `store` before `record` is touched; on any
    /// error `record` is left as it was.
    pub fn publish<S: RecordStore + ?Sized>(
        &self,
        record: &mut ContentRecord,
        store: &S,
    ) -> Result<PublishedBuild, PublishError> {
        let id = record.id;
        let lock = self.lock_for(id);
        let result = {
            let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
            self.publish_locked(record, store)
        };
        drop(lock);
        // keep the entry only while another caller holds it
        self.locks.remove_if(&id, |_, lock| Arc::strong_count(lock) == 1);
        result
    }

    fn publish_locked<S: RecordStore + ?Sized>(
        &self,
        record: &mut ContentRecord,
        store: &S,
    ) -> Result<PublishedBuild, PublishError> {
        let _span = info_span!("publish", record = %record.id).entered();

        let archive = record.archive_file.as_ref().ok_or(PublishError::MissingFile)?;
        if !archive.has_extension("zip") {
            return Err(PublishError::UnsupportedFormat {
                file: archive.name.clone(),
            });
        }

        let build_dir = self.layout.build_dir(record.id);
        if !remove_dir_best_effort(&build_dir) {
            warn!(path = %build_dir.display(), "previous build could not be fully removed");
        }

        let file = File::open(&archive.path).map_err(sudaplay_archive::Error::from)?;
        let staged = extract_to_workspace(BufReader::new(file), &build_dir, &self.options)
            .inspect_err(|e| debug!(error = %e, "extraction rejected"))?;

        let Some(entry_page) = find_entry_page(staged.staging_path()) else {
            staged.abort();
            return Err(PublishError::MissingEntryPage);
        };

        let report = staged.commit()?;
        let playable_path = self.layout.playable_path(record.id, &entry_page);

        let fields = PublishFields::published(playable_path.clone(), Utc::now());
        if let Err(e) = store.save_publish(record.id, &fields) {
            remove_dir_best_effort(&build_dir);
            return Err(e.into());
        }
        record.apply_publish(&fields);

        let files: Vec<BuiltFile> = report
            .files()
            .map(|entry| BuiltFile {
                path: entry.relative_path.clone(),
                size: entry.size,
                sha256: entry.hash.clone(),
            })
            .collect();
        let published = PublishedBuild {
            playable_path,
            build_dir,
            entry_page,
            file_count: files.len(),
            total_bytes: report.total_bytes,
            files,
        };
        info!(
            playable_path = %published.playable_path,
            files = published.file_count,
            bytes = published.total_bytes,
            "build published"
        );
        Ok(published)
    }

    /// Same as [`Publisher::publish`], flattened to a success flag and message.
    pub fn publish_status<S: RecordStore + ?Sized>(
        &self,
        record: &mut ContentRecord,
        store: &S,
    ) -> PublishStatus {
        PublishStatus::from(&self.publish(record, store))
    }

    fn lock_for(&self, id: RecordId) -> Arc<Mutex<()>> {
        self.locks.entry(id).or_default().clone()
    }
}
