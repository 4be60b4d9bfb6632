use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sudaplay_fs::{Durability, atomic_read, atomic_write};
use tracing::debug;

use super::{Counter, RecordStore, newest_first};
use crate::error::{StoreError, StoreResult};
use crate::model::{ContentRecord, GameRating, NewRecord, PublishFields, RecordId, UserId};

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct Catalog {
    last_id: u64,
    records: Vec<ContentRecord>,
    ratings: Vec<GameRating>,
}

impl Catalog {
    fn record_mut(&mut self, id: RecordId) -> StoreResult<&mut ContentRecord> {
        self.records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(StoreError::NotFound(id))
    }
}

/// Store persisted as one JSON document.
///
/// Every mutation rewrites the file atomically; the in-memory copy only
/// changes once the write succeeded.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    catalog: Mutex<Catalog>,
}

impl JsonFileStore {
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let catalog = match atomic_read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(sudaplay_fs::Error::NotFound(_)) => Catalog::default(),
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), records = catalog.records.len(), "catalog loaded");
        Ok(Self {
            path,
            catalog: Mutex::new(catalog),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read<T>(&self, f: impl FnOnce(&Catalog) -> T) -> StoreResult<T> {
        let catalog = self.catalog.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(f(&catalog))
    }

    fn write<T>(&self, f: impl FnOnce(&mut Catalog) -> StoreResult<T>) -> StoreResult<T> {
        let mut catalog = self.catalog.lock().map_err(|_| StoreError::Poisoned)?;
        let mut next = catalog.clone();
        let value = f(&mut next)?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| sudaplay_fs::Error::CreateDir {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        let bytes = serde_json::to_vec_pretty(&next)?;
        atomic_write(&self.path, &bytes, Durability::Synced)?;

        *catalog = next;
        Ok(value)
    }
}

impl RecordStore for JsonFileStore {
    fn insert(&self, new: NewRecord) -> StoreResult<ContentRecord> {
        self.write(|catalog| {
            catalog.last_id += 1;
            let record = ContentRecord::from_new(RecordId(catalog.last_id), new, Utc::now());
            catalog.records.push(record.clone());
            Ok(record)
        })
    }

    fn get(&self, id: RecordId) -> StoreResult<Option<ContentRecord>> {
        self.read(|catalog| catalog.records.iter().find(|r| r.id == id).cloned())
    }

    fn list(&self) -> StoreResult<Vec<ContentRecord>> {
        let mut records = self.read(|catalog| catalog.records.clone())?;
        newest_first(&mut records);
        Ok(records)
    }

    fn save_publish(&self, id: RecordId, fields: &PublishFields) -> StoreResult<()> {
        self.write(|catalog| {
            catalog.record_mut(id)?.apply_publish(fields);
            Ok(())
        })
    }

    fn increment(&self, id: RecordId, counter: Counter) -> StoreResult<u64> {
        self.write(|catalog| {
            let record = catalog.record_mut(id)?;
            let value = match counter {
                Counter::Views => &mut record.views,
                Counter::Downloads => &mut record.downloads,
            };
            *value += 1;
            Ok(*value)
        })
    }

    fn add_rating(&self, rating: GameRating) -> StoreResult<ContentRecord> {
        self.write(|catalog| {
            if catalog
                .ratings
                .iter()
                .any(|r| r.record == rating.record && r.user == rating.user)
            {
                return Err(StoreError::DuplicateRating {
                    record: rating.record,
                    user: rating.user,
                });
            }
            let record = catalog.record_mut(rating.record)?;
            record.rating = record.rating.add_vote(record.rating_votes, rating.value);
            record.rating_votes += 1;
            let updated = record.clone();
            catalog.ratings.push(rating);
            Ok(updated)
        })
    }

    fn user_rating(&self, id: RecordId, user: UserId) -> StoreResult<Option<u8>> {
        self.read(|catalog| {
            catalog
                .ratings
                .iter()
                .find(|r| r.record == id && r.user == user)
                .map(|r| r.value)
        })
    }

    fn delete(&self, id: RecordId) -> StoreResult<Option<ContentRecord>> {
        self.write(|catalog| {
            let Some(position) = catalog.records.iter().position(|r| r.id == id) else {
                return Ok(None);
            };
            catalog.ratings.retain(|r| r.record != id);
            Ok(Some(catalog.records.remove(position)))
        })
    }
}
