//! Per-user extract-join pipeline over the three study relations.

use polars::prelude::*;
use tracing::debug;

use crate::error::{Error, Result};
use crate::store::StudyStore;

/// Load one user's reviews, cards and decks and inner-join them into a
/// single frame.
///
/// Reviews are numbered with a 1-based `review_th` column in fetched order
/// (the store returns them pre-sorted by timestamp). The join order is
/// load-bearing: reviews join to cards on `card_id` first, then the result
/// to decks on `deck_id`, so a review referencing a deleted card or deck
/// silently drops out.
pub fn load_joined(store: &dyn StudyStore, user_id: u32) -> Result<DataFrame> {
    let mut revlogs = store.revlogs(user_id)?;
    if revlogs.is_empty() {
        return Err(Error::NotFound {
            user_id,
            relation: "data",
        });
    }

    let revlogs_count = revlogs.height();
    debug!("User {}: fetched {} revlogs", user_id, revlogs_count);

    let review_th: Vec<i64> = (1..=revlogs_count as i64).collect();
    revlogs.with_column(Series::new("review_th", review_th))?;

    // Scoping is already established by the filter; the column is never
    // needed again.
    let revlogs = revlogs.drop("user_id")?;

    let cards = store.cards(user_id)?;
    if cards.is_empty() {
        return Err(Error::NotFound {
            user_id,
            relation: "card data",
        });
    }
    let cards = cards.drop("user_id")?;

    let decks = store.decks(user_id)?;
    if decks.is_empty() {
        return Err(Error::NotFound {
            user_id,
            relation: "deck data",
        });
    }
    let decks = decks.drop("user_id")?;

    let joined = revlogs
        .inner_join(&cards, ["card_id"], ["card_id"])?
        .inner_join(&decks, ["deck_id"], ["deck_id"])?;
    if joined.is_empty() {
        return Err(Error::NotFound {
            user_id,
            relation: "joined data",
        });
    }

    Ok(joined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryStore;

    fn store_with_orphan_review() -> MemoryStore {
        // Card 11 was deleted: its two reviews must not survive the join.
        let revlogs = df!(
            "user_id" => [1i64, 1, 1, 1],
            "card_id" => [10i64, 10, 11, 11],
            "state" => [2i64, 2, 2, 2],
            "rating" => [3i64, 3, 3, 3],
        )
        .unwrap();
        let cards = df!(
            "user_id" => [1i64],
            "card_id" => [10i64],
            "note_id" => [1000i64],
            "deck_id" => [100i64],
        )
        .unwrap();
        let decks = df!(
            "user_id" => [1i64],
            "deck_id" => [100i64],
        )
        .unwrap();
        MemoryStore::new(revlogs, cards, decks)
    }

    #[test]
    fn test_unknown_user_reports_no_data() {
        let store = store_with_orphan_review();
        let err = load_joined(&store, 99).unwrap_err();
        assert_eq!(err.to_string(), "No data found for user 99");
    }

    #[test]
    fn test_orphan_reviews_are_dropped() {
        let store = store_with_orphan_review();
        let joined = load_joined(&store, 1).unwrap();
        assert_eq!(joined.height(), 2);

        // Sequence numbers are assigned before the join, so the surviving
        // rows keep their original positions.
        let mut review_th: Vec<i64> = joined
            .column("review_th")
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        review_th.sort_unstable();
        assert_eq!(review_th, vec![1, 2]);
    }

    #[test]
    fn test_user_id_column_is_dropped() {
        let store = store_with_orphan_review();
        let joined = load_joined(&store, 1).unwrap();
        assert!(joined.column("user_id").is_err());
    }

    #[test]
    fn test_missing_cards_reports_no_card_data() {
        let revlogs = df!(
            "user_id" => [7i64],
            "card_id" => [10i64],
            "state" => [2i64],
            "rating" => [3i64],
        )
        .unwrap();
        let cards = df!(
            "user_id" => [1i64],
            "card_id" => [10i64],
            "note_id" => [1000i64],
            "deck_id" => [100i64],
        )
        .unwrap();
        let decks = df!(
            "user_id" => [1i64],
            "deck_id" => [100i64],
        )
        .unwrap();
        let store = MemoryStore::new(revlogs, cards, decks);

        let err = load_joined(&store, 7).unwrap_err();
        assert_eq!(err.to_string(), "No card data found for user 7");
    }

    #[test]
    fn test_empty_join_reports_no_joined_data() {
        // The user's only card points at a deck that no longer exists.
        let revlogs = df!(
            "user_id" => [1i64],
            "card_id" => [10i64],
            "state" => [2i64],
            "rating" => [3i64],
        )
        .unwrap();
        let cards = df!(
            "user_id" => [1i64],
            "card_id" => [10i64],
            "note_id" => [1000i64],
            "deck_id" => [100i64],
        )
        .unwrap();
        let decks = df!(
            "user_id" => [1i64],
            "deck_id" => [999i64],
        )
        .unwrap();
        let store = MemoryStore::new(revlogs, cards, decks);

        let err = load_joined(&store, 1).unwrap_err();
        assert_eq!(err.to_string(), "No joined data found for user 1");
    }
}
