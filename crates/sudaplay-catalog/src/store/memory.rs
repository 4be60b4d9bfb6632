use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use super::{Counter, RecordStore, newest_first};
use crate::error::{StoreError, StoreResult};
use crate::model::{ContentRecord, GameRating, NewRecord, PublishFields, RecordId, UserId};

/// Thread-safe in-process store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: DashMap<RecordId, ContentRecord>,
    ratings: DashMap<(RecordId, UserId), GameRating>,
    last_id: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    fn insert(&self, new: NewRecord) -> StoreResult<ContentRecord> {
        let id = RecordId(self.last_id.fetch_add(1, Ordering::SeqCst) + 1);
        let record = ContentRecord::from_new(id, new, Utc::now());
        self.records.insert(id, record.clone());
        Ok(record)
    }

    fn get(&self, id: RecordId) -> StoreResult<Option<ContentRecord>> {
        Ok(self.records.get(&id).map(|r| r.value().clone()))
    }

    fn list(&self) -> StoreResult<Vec<ContentRecord>> {
        let mut records: Vec<_> = self.records.iter().map(|r| r.value().clone()).collect();
        newest_first(&mut records);
        Ok(records)
    }

    fn save_publish(&self, id: RecordId, fields: &PublishFields) -> StoreResult<()> {
        let mut record = self.records.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        record.apply_publish(fields);
        Ok(())
    }

    fn increment(&self, id: RecordId, counter: Counter) -> StoreResult<u64> {
        let mut record = self.records.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        let value = match counter {
            Counter::Views => &mut record.views,
            Counter::Downloads => &mut record.downloads,
        };
        *value += 1;
        Ok(*value)
    }

    fn add_rating(&self, rating: GameRating) -> StoreResult<ContentRecord> {
        let (id, user) = (rating.record, rating.user);
        match self.ratings.entry((id, user)) {
            Entry::Occupied(_) => Err(StoreError::DuplicateRating { record: id, user }),
            Entry::Vacant(slot) => {
                let mut record = self.records.get_mut(&id).ok_or(StoreError::NotFound(id))?;
                record.rating = record.rating.add_vote(record.rating_votes, rating.value);
                record.rating_votes += 1;
                let updated = record.clone();
                drop(record);
                slot.insert(rating);
                Ok(updated)
            }
        }
    }

    fn user_rating(&self, id: RecordId, user: UserId) -> StoreResult<Option<u8>> {
        Ok(self.ratings.get(&(id, user)).map(|r| r.value))
    }

    fn delete(&self, id: RecordId) -> StoreResult<Option<ContentRecord>> {
        self.ratings.retain(|(record, _), _| *record != id);
        Ok(self.records.remove(&id).map(|(_, record)| record))
    }
}
