use chrono::Utc;
use tracing::info;

use crate::error::RatingError;
use crate::model::{GameRating, Rating, RecordId, UserId};
use crate::store::RecordStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RatingOutcome {
    pub average: Rating,
    pub votes: u32,
}

/// Record a 1 to 5 vote by `user` and return the updated average.
///
/// Each user rates a record once; records that are not approved cannot be
/// rated.
pub fn rate<S: RecordStore + ?Sized>(
    store: &S,
    id: RecordId,
    user: UserId,
    value: i64,
) -> Result<RatingOutcome, RatingError> {
    let value = u8::try_from(value)
        .ok()
        .filter(|v| (1..=5).contains(v))
        .ok_or(RatingError::OutOfRange(value))?;

    match store.get(id)? {
        Some(record) if record.is_approved => {}
        _ => return Err(RatingError::NotFound(id)),
    }

    let record = store.add_rating(GameRating {
        record: id,
        user,
        value,
        created_at: Utc::now(),
    })?;

    info!(record = %id, user = %user, value, average = %record.rating, "rating added");
    Ok(RatingOutcome {
        average: record.rating,
        votes: record.rating_votes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Genre, NewRecord};
    use crate::store::MemoryStore;

    fn insert(store: &MemoryStore, approved: bool) -> RecordId {
        store
            .insert(NewRecord {
                title: "Chess".into(),
                short_description: String::new(),
                description: "d".into(),
                genre: Genre::Estrategia,
                cover_image: None,
                archive_file: None,
                external_url: Some("https://example.com/chess".into()),
                is_approved: approved,
                is_featured: false,
                uploaded_by: UserId(1),
            })
            .unwrap()
            .id
    }

    #[test]
    fn averages_and_one_vote_per_user() {
        let store = MemoryStore::new();
        let id = insert(&store, true);

        let first = rate(&store, id, UserId(2), 3).unwrap();
        assert_eq!((first.average.to_string(), first.votes), ("3.0".into(), 1));

        let second = rate(&store, id, UserId(3), 4).unwrap();
        assert_eq!((second.average.to_string(), second.votes), ("3.5".into(), 2));

        assert!(matches!(
            rate(&store, id, UserId(2), 5),
            Err(RatingError::AlreadyRated)
        ));
        assert_eq!(store.user_rating(id, UserId(2)).unwrap(), Some(3));
    }

    #[test]
    fn rejects_out_of_range_values() {
        let store = MemoryStore::new();
        let id = insert(&store, true);
        for value in [0, 6, -1, 300] {
            assert!(matches!(
                rate(&store, id, UserId(2), value),
                Err(RatingError::OutOfRange(v)) if v == value
            ));
        }
    }

    #[test]
    fn unapproved_or_missing_records_cannot_be_rated() {
        let store = MemoryStore::new();
        let hidden = insert(&store, false);
        assert!(matches!(
            rate(&store, hidden, UserId(2), 4),
            Err(RatingError::NotFound(_))
        ));
        assert!(matches!(
            rate(&store, RecordId(99), UserId(2), 4),
            Err(RatingError::NotFound(RecordId(99)))
        ));
    }
}
