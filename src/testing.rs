//! Testing utilities and fixtures.

use polars::prelude::*;

use crate::error::Result;
use crate::store::StudyStore;

/// In-memory [`StudyStore`] holding full relations and filtering per call.
pub struct MemoryStore {
    revlogs: DataFrame,
    cards: DataFrame,
    decks: DataFrame,
}

impl MemoryStore {
    pub fn new(revlogs: DataFrame, cards: DataFrame, decks: DataFrame) -> Self {
        Self {
            revlogs,
            cards,
            decks,
        }
    }

    fn filter(df: &DataFrame, user_id: u32) -> Result<DataFrame> {
        Ok(df
            .clone()
            .lazy()
            .filter(col("user_id").eq(lit(user_id as i64)))
            .collect()?)
    }
}

impl StudyStore for MemoryStore {
    fn revlogs(&self, user_id: u32) -> Result<DataFrame> {
        Self::filter(&self.revlogs, user_id)
    }

    fn cards(&self, user_id: u32) -> Result<DataFrame> {
        Self::filter(&self.cards, user_id)
    }

    fn decks(&self, user_id: u32) -> Result<DataFrame> {
        Self::filter(&self.decks, user_id)
    }
}

/// A store with two well-behaved users and one user (7) who appears in the
/// card and deck relations but has no reviews.
pub fn sample_store() -> MemoryStore {
    let revlogs = df!(
        "user_id" => [1i64, 1, 1, 1, 2, 2],
        "card_id" => [10i64, 10, 11, 11, 20, 20],
        "state" => [1i64, 2, 2, 2, 2, 2],
        "rating" => [3i64, 3, 1, 4, 3, 3],
    )
    .unwrap();
    let cards = df!(
        "user_id" => [1i64, 1, 2, 7],
        "card_id" => [10i64, 11, 20, 70],
        "note_id" => [1000i64, 1001, 2000, 7000],
        "deck_id" => [100i64, 100, 200, 700],
    )
    .unwrap();
    let decks = df!(
        "user_id" => [1i64, 2, 7],
        "deck_id" => [100i64, 200, 700],
    )
    .unwrap();
    MemoryStore::new(revlogs, cards, decks)
}
