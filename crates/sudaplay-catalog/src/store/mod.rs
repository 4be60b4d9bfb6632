//! Record persistence.
//!
//! The publisher and the catalog operations only need the narrow contract of
//! [`RecordStore`]; any relational backend can implement it.

mod json;
mod memory;

pub use json::JsonFileStore;
pub use memory::MemoryStore;

use crate::error::StoreResult;
use crate::model::{ContentRecord, GameRating, NewRecord, PublishFields, RecordId, UserId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Counter {
    Views,
    Downloads,
}

pub trait RecordStore: Send + Sync {
    fn insert(&self, new: NewRecord) -> StoreResult<ContentRecord>;

    fn get(&self, id: RecordId) -> StoreResult<Option<ContentRecord>>;

    /// All records, newest first.
    fn list(&self) -> StoreResult<Vec<ContentRecord>>;

    /// Write the publish columns and `updated_at` as one update.
    fn save_publish(&self, id: RecordId, fields: &PublishFields) -> StoreResult<()>;

    /// Add one to a counter and return the new value.
    fn increment(&self, id: RecordId, counter: Counter) -> StoreResult<u64>;

    /// Store a rating and fold it into the record's average.
    ///
    /// Fails with [`crate::StoreError::DuplicateRating`] when the user already
    /// rated the record.
    fn add_rating(&self, rating: GameRating) -> StoreResult<ContentRecord>;

    fn user_rating(&self, id: RecordId, user: UserId) -> StoreResult<Option<u8>>;

    /// Remove a record together with its ratings.
    fn delete(&self, id: RecordId) -> StoreResult<Option<ContentRecord>>;
}

pub(crate) fn newest_first(records: &mut [ContentRecord]) {
    records.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}
