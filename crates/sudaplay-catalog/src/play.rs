//! Play targets, view and download counters.

use std::path::PathBuf;

use tracing::debug;

use crate::error::PlayError;
use crate::model::{ContentRecord, RecordId, UserId};
use crate::store::{Counter, RecordStore};

/// File name offered to browsers for every archive download.
pub const DOWNLOAD_NAME: &str = "archivo.zip";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlayTarget {
    /// The extracted build, served below the media URL.
    Embedded(String),
    External(String),
    Unavailable,
}

impl PlayTarget {
    pub fn mode(&self) -> &'static str {
        match self {
            Self::Embedded(_) => "embedded",
            Self::External(_) => "external",
            Self::Unavailable => "unavailable",
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Embedded(url) | Self::External(url) => Some(url),
            Self::Unavailable => None,
        }
    }

    pub fn can_play(&self) -> bool {
        !matches!(self, Self::Unavailable)
    }
}

/// Where a record can be played: its own build first, then its external link.
pub fn play_target(record: &ContentRecord, media_url: &str) -> PlayTarget {
    if record.is_web_playable && !record.playable_path.is_empty() {
        PlayTarget::Embedded(media_join(media_url, &record.playable_path))
    } else if let Some(url) = record.external_url.as_deref().filter(|u| !u.is_empty()) {
        PlayTarget::External(url.to_string())
    } else {
        PlayTarget::Unavailable
    }
}

/// Approved records are public; the rest only exist for their uploader.
pub fn visible_to(record: &ContentRecord, viewer: Option<UserId>) -> bool {
    record.is_approved || viewer == Some(record.uploaded_by)
}

#[derive(Clone, Debug)]
pub struct GameDetail {
    pub record: ContentRecord,
    /// Always [`PlayTarget::Unavailable`] while the record is not approved.
    pub target: PlayTarget,
    pub is_owner: bool,
}

pub fn detail<S: RecordStore + ?Sized>(
    store: &S,
    id: RecordId,
    media_url: &str,
    viewer: Option<UserId>,
) -> Result<GameDetail, PlayError> {
    let record = store
        .get(id)?
        .filter(|r| visible_to(r, viewer))
        .ok_or(PlayError::NotFound(id))?;

    let target = if record.is_approved {
        play_target(&record, media_url)
    } else {
        PlayTarget::Unavailable
    };
    let is_owner = viewer == Some(record.uploaded_by);

    Ok(GameDetail {
        record,
        target,
        is_owner,
    })
}

#[derive(Clone, Debug)]
pub struct PlaySession {
    pub record: ContentRecord,
    pub target: PlayTarget,
    /// The viewer's own vote, if any.
    pub user_rating: Option<u8>,
}

/// Open the play view of an approved record, counting one view.
pub fn play<S: RecordStore + ?Sized>(
    store: &S,
    id: RecordId,
    media_url: &str,
    viewer: Option<UserId>,
) -> Result<PlaySession, PlayError> {
    let mut record = store
        .get(id)?
        .filter(|r| r.is_approved)
        .ok_or(PlayError::NotFound(id))?;

    record.views = store.increment(id, Counter::Views)?;
    let target = play_target(&record, media_url);
    let user_rating = match viewer {
        Some(user) => store.user_rating(id, user)?,
        None => None,
    };

    debug!(record = %id, views = record.views, mode = target.mode(), "play view");
    Ok(PlaySession {
        record,
        target,
        user_rating,
    })
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Download {
    pub path: PathBuf,
    pub attachment_name: &'static str,
    pub downloads: u64,
}

/// Resolve the archive to send for a download, counting one download.
pub fn download<S: RecordStore + ?Sized>(
    store: &S,
    id: RecordId,
    viewer: UserId,
) -> Result<Download, PlayError> {
    let record = store
        .get(id)?
        .filter(|r| visible_to(r, Some(viewer)))
        .ok_or(PlayError::NotFound(id))?;

    let archive = record.archive_file.ok_or(PlayError::NoArchive(id))?;
    if !archive.path.is_file() {
        return Err(PlayError::FileMissing {
            id,
            path: archive.path,
        });
    }

    let downloads = store.increment(id, Counter::Downloads)?;
    debug!(record = %id, downloads, "download");
    Ok(Download {
        path: archive.path,
        attachment_name: DOWNLOAD_NAME,
        downloads,
    })
}

fn media_join(media_url: &str, relative: &str) -> String {
    format!(
        "{}/{}",
        media_url.trim_end_matches('/'),
        relative.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Genre, NewRecord, PublishFields, StoredFile};
    use crate::store::MemoryStore;
    use chrono::Utc;
    use tempfile::tempdir;

    fn new_record(approved: bool, archive: Option<StoredFile>) -> NewRecord {
        NewRecord {
            title: "Racer".into(),
            short_description: String::new(),
            description: "fast".into(),
            genre: Genre::Carreras,
            cover_image: None,
            archive_file: archive,
            external_url: Some("https://example.com/racer".into()),
            is_approved: approved,
            is_featured: false,
            uploaded_by: UserId(5),
        }
    }

    #[test]
    fn target_prefers_own_build() {
        let store = MemoryStore::new();
        let mut record = store.insert(new_record(true, None)).unwrap();
        assert_eq!(
            play_target(&record, "/media/"),
            PlayTarget::External("https://example.com/racer".into())
        );

        record.apply_publish(&PublishFields::published(
            "games/builds/1/index.html",
            Utc::now(),
        ));
        let target = play_target(&record, "/media/");
        assert_eq!(target.url(), Some("/media/games/builds/1/index.html"));
        assert_eq!(target.mode(), "embedded");
        assert_eq!(
            play_target(&record, "https://cdn.example.com/media").url(),
            Some("https://cdn.example.com/media/games/builds/1/index.html")
        );

        record.is_web_playable = false;
        record.external_url = None;
        assert!(!play_target(&record, "/media/").can_play());
    }

    #[test]
    fn play_counts_views_of_approved_records_only() {
        let store = MemoryStore::new();
        let public = store.insert(new_record(true, None)).unwrap();
        let hidden = store.insert(new_record(false, None)).unwrap();

        play(&store, public.id, "/media/", None).unwrap();
        let session = play(&store, public.id, "/media/", Some(UserId(9))).unwrap();
        assert_eq!(session.record.views, 2);
        assert_eq!(session.user_rating, None);

        assert!(matches!(
            play(&store, hidden.id, "/media/", Some(UserId(5))),
            Err(PlayError::NotFound(_))
        ));
        assert_eq!(store.get(hidden.id).unwrap().unwrap().views, 0);
    }

    #[test]
    fn unapproved_detail_is_owner_only_and_unplayable() {
        let store = MemoryStore::new();
        let hidden = store.insert(new_record(false, None)).unwrap();

        let owner = detail(&store, hidden.id, "/media/", Some(UserId(5))).unwrap();
        assert!(owner.is_owner);
        assert_eq!(owner.target, PlayTarget::Unavailable);

        assert!(detail(&store, hidden.id, "/media/", Some(UserId(6))).is_err());
        assert!(detail(&store, hidden.id, "/media/", None).is_err());
    }

    #[test]
    fn download_counts_and_checks_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("racer.zip");
        std::fs::write(&path, b"PK\x05\x06").unwrap();

        let store = MemoryStore::new();
        let archive = StoredFile {
            name: "games/files/racer.zip".into(),
            path: path.clone(),
        };
        let record = store.insert(new_record(true, Some(archive))).unwrap();

        let sent = download(&store, record.id, UserId(7)).unwrap();
        assert_eq!(sent.path, path);
        assert_eq!(sent.attachment_name, "archivo.zip");
        assert_eq!(sent.downloads, 1);

        std::fs::remove_file(&path).unwrap();
        assert!(matches!(
            download(&store, record.id, UserId(7)),
            Err(PlayError::FileMissing { .. })
        ));
        assert_eq!(store.get(record.id).unwrap().unwrap().downloads, 1);

        let no_file = store.insert(new_record(true, None)).unwrap();
        assert!(matches!(
            download(&store, no_file.id, UserId(7)),
            Err(PlayError::NoArchive(_))
        ));
    }
}
