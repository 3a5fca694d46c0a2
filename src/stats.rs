//! Summary statistics over one user's joined review frame.

use polars::prelude::*;
use serde::Serialize;

use crate::error::{Error, Result};

/// Summary statistics for one user, serialized as one JSONL row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserStats {
    pub user_id: u32,
    pub revlogs_count: usize,
    pub card_count: usize,
    pub note_count: usize,
    pub avg_review_count_per_note: f64,
    pub avg_review_count_per_card: f64,
    pub ratio: f64,
    /// Fraction of review-state rows (`state == 2`) rated as a pass.
    /// `None` (serialized as `null`) when the user has no review-state rows.
    pub retention_rate: Option<f64>,
}

/// Compute the per-user statistics from a non-empty joined frame.
pub fn aggregate(user_id: u32, joined: &DataFrame) -> Result<UserStats> {
    let revlogs_count = joined.height();
    let card_count = joined.column("card_id")?.n_unique()?;
    let note_count = joined.column("note_id")?.n_unique()?;

    let avg_review_count_per_note = round2(mean_reviews_per(joined, "note_id")?);
    let avg_review_count_per_card = round2(mean_reviews_per(joined, "card_id")?);

    // Cannot be zero for a non-empty join (every surviving card has at least
    // one review), but never divide blind.
    if avg_review_count_per_card == 0.0 {
        return Err(Error::Aggregation {
            user_id,
            message: "average review count per card is zero".to_string(),
        });
    }
    let ratio = round2(avg_review_count_per_note / avg_review_count_per_card);

    let retention_rate = retention_rate(user_id, joined)?;

    Ok(UserStats {
        user_id,
        revlogs_count,
        card_count,
        note_count,
        avg_review_count_per_note,
        avg_review_count_per_card,
        ratio,
        retention_rate,
    })
}

/// Mean number of reviews per distinct value of `key`.
fn mean_reviews_per(joined: &DataFrame, key: &str) -> Result<f64> {
    let counts = joined
        .clone()
        .lazy()
        .group_by([col(key)])
        .agg([len().alias("review_count")])
        .collect()?;
    Ok(counts.column("review_count")?.mean().unwrap_or(0.0))
}

/// Retention over review-state rows: rating 1 is a fail, 2 through 4 a pass.
fn retention_rate(user_id: u32, joined: &DataFrame) -> Result<Option<f64>> {
    let review_state = joined
        .clone()
        .lazy()
        .filter(col("state").eq(lit(2i64)))
        .select([col("rating")])
        .collect()?;
    if review_state.is_empty() {
        return Ok(None);
    }

    let ratings = review_state.column("rating")?.cast(&DataType::Int64)?;
    let mut passes = 0usize;
    for rating in ratings.i64()?.into_iter() {
        match rating {
            Some(1) => {}
            Some(2..=4) => passes += 1,
            other => {
                return Err(Error::Aggregation {
                    user_id,
                    message: format!("unmappable rating value {other:?}"),
                })
            }
        }
    }

    Ok(Some(round2(passes as f64 / review_state.height() as f64)))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
