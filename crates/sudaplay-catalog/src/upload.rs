//! Upload validation and the upload handler.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use sudaplay_archive::list_from_reader;
use tracing::{info, info_span, warn};

use crate::entry_page::ENTRY_PAGE;
use crate::error::UploadError;
use crate::model::{ContentRecord, Genre, NewRecord, StoredFile, UserId};
use crate::publish::Publisher;
use crate::removal::remove_record;
use crate::store::RecordStore;

pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 500 * 1024 * 1024;

const TITLE_MAX_CHARS: usize = 200;
const SHORT_DESCRIPTION_MAX_CHARS: usize = 300;

/// An archive received from a client, still at its temporary location.
#[derive(Clone, Debug)]
pub struct ArchiveUpload {
    /// Name the client gave the file.
    pub file_name: String,
    pub source: PathBuf,
}

#[derive(Clone, Debug)]
pub struct NewGame {
    pub title: String,
    pub short_description: String,
    pub description: String,
    pub genre: Genre,
    /// Media-relative path of an already stored cover.
    pub cover_image: Option<String>,
    pub external_url: Option<String>,
    pub archive: Option<ArchiveUpload>,
}

impl NewGame {
    /// Check the fields and, when an archive is attached, that it is a
    /// readable ZIP holding an `index.html` somewhere.
    pub fn validate(&self, max_upload_bytes: u64) -> Result<(), UploadError> {
        if self.title.trim().is_empty() {
            return Err(invalid("title", "this field is required"));
        }
        if self.title.chars().count() > TITLE_MAX_CHARS {
            return Err(invalid(
                "title",
                format!("at most {TITLE_MAX_CHARS} characters"),
            ));
        }
        if self.short_description.chars().count() > SHORT_DESCRIPTION_MAX_CHARS {
            return Err(invalid(
                "short_description",
                format!("at most {SHORT_DESCRIPTION_MAX_CHARS} characters"),
            ));
        }
        if self.description.trim().is_empty() {
            return Err(invalid("description", "this field is required"));
        }

        let external_url = self.external_url();
        if let Some(url) = external_url
            && !is_http_url(url)
        {
            return Err(invalid("external_url", "enter a valid http(s) URL"));
        }

        match &self.archive {
            Some(archive) => check_archive(archive, max_upload_bytes),
            None if external_url.is_none() => Err(UploadError::MissingContent),
            None => Ok(()),
        }
    }

    fn external_url(&self) -> Option<&str> {
        self.external_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
    }
}

fn check_archive(archive: &ArchiveUpload, max_upload_bytes: u64) -> Result<(), UploadError> {
    if !archive.file_name.to_lowercase().ends_with(".zip") {
        return Err(UploadError::NotZip);
    }

    let unreadable = |e| UploadError::Unreadable {
        path: archive.source.clone(),
        source: e,
    };
    let size = std::fs::metadata(&archive.source).map_err(unreadable)?.len();
    if size > max_upload_bytes {
        return Err(UploadError::TooLarge {
            size,
            limit: max_upload_bytes,
        });
    }

    let file = File::open(&archive.source).map_err(unreadable)?;
    let listing = list_from_reader(BufReader::new(file)).map_err(|_| UploadError::InvalidZip)?;
    if !listing.contains_name_ending_with(ENTRY_PAGE) {
        return Err(UploadError::MissingIndex);
    }
    Ok(())
}

fn invalid(field: &'static str, reason: impl Into<String>) -> UploadError {
    UploadError::InvalidField {
        field,
        reason: reason.into(),
    }
}

fn is_http_url(url: &str) -> bool {
    let lower = url.to_lowercase();
    ["http://", "https://"].iter().any(|scheme| {
        lower
            .strip_prefix(*scheme)
            .is_some_and(|rest| !rest.is_empty() && !rest.contains(char::is_whitespace))
    })
}

/// Keep the last path component, replace anything unusual in it and make
/// sure the result still ends in `.zip`.
fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(|c| c == '/' || c == '\\').next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload.zip".to_string()
    } else if cleaned.to_ascii_lowercase().ends_with(".zip") {
        cleaned.to_string()
    } else {
        format!("{cleaned}.zip")
    }
}

/// Creates records from uploads and publishes their archives.
///
/// A record whose archive fails to publish is deleted again, files included,
/// so a failed upload leaves nothing behind.
pub struct UploadHandler<'a, S: RecordStore + ?Sized> {
    store: &'a S,
    publisher: &'a Publisher,
    max_upload_bytes: u64,
}

impl<'a, S: RecordStore + ?Sized> UploadHandler<'a, S> {
    pub fn new(store: &'a S, publisher: &'a Publisher) -> Self {
        Self {
            store,
            publisher,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn max_upload_bytes(mut self, bytes: u64) -> Self {
        self.max_upload_bytes = bytes;
        self
    }

    pub fn submit(&self, game: NewGame, uploader: UserId) -> Result<ContentRecord, UploadError> {
        let _span = info_span!("upload", user = %uploader, title = %game.title).entered();
        game.validate(self.max_upload_bytes)?;

        let external_url = game.external_url().map(str::to_string);
        let archive_file = game
            .archive
            .as_ref()
            .map(|archive| self.store_archive(archive))
            .transpose()?;

        let inserted = self.store.insert(NewRecord {
            title: game.title.trim().to_string(),
            short_description: game.short_description,
            description: game.description,
            genre: game.genre,
            cover_image: game.cover_image,
            archive_file: archive_file.clone(),
            external_url,
            is_approved: true,
            is_featured: false,
            uploaded_by: uploader,
        });
        let mut record = match inserted {
            Ok(record) => record,
            Err(e) => {
                if let Some(file) = &archive_file {
                    sudaplay_fs::remove_file_best_effort(&file.path);
                }
                return Err(e.into());
            }
        };

        if record.archive_file.is_some()
            && let Err(e) = self.publisher.publish(&mut record, self.store)
        {
            warn!(record = %record.id, error = %e, "publish failed, discarding record");
            if let Err(cleanup) = remove_record(self.store, self.publisher.layout(), record.id) {
                warn!(record = %record.id, error = %cleanup, "could not discard record");
            }
            return Err(UploadError::Publish(e));
        }

        info!(record = %record.id, playable = record.is_web_playable, "game uploaded");
        Ok(record)
    }

    fn store_archive(&self, archive: &ArchiveUpload) -> Result<StoredFile, UploadError> {
        let layout = self.publisher.layout();
        let dir = layout.files();
        let storage = |path: &Path, e| UploadError::Storage {
            path: path.to_path_buf(),
            source: e,
        };
        std::fs::create_dir_all(dir).map_err(|e| storage(dir, e))?;

        let stored_name = format!(
            "{}-{}",
            uuid::Uuid::new_v4().simple(),
            sanitize_file_name(&archive.file_name)
        );
        let path = dir.join(&stored_name);
        std::fs::copy(&archive.source, &path).map_err(|e| storage(&path, e))?;

        let name = layout
            .relative_name(&path)
            .unwrap_or_else(|| format!("games/files/{stored_name}"));
        Ok(StoredFile { name, path })
    }
}
