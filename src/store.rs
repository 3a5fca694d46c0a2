//! Columnar store access for the three study relations.

use std::path::PathBuf;

use polars::prelude::*;

use crate::error::Result;

/// Read access to per-user slices of the study dataset.
///
/// Each method returns the rows of one relation filtered to a single user
/// (equality on `user_id`). The store guarantees that review rows come back
/// pre-sorted by timestamp; everything downstream (joins, aggregation)
/// happens on the returned frames, so any table engine with an equality
/// filter can sit behind this trait.
pub trait StudyStore: Send + Sync {
    /// Review log rows for one user, sorted by timestamp.
    fn revlogs(&self, user_id: u32) -> Result<DataFrame>;

    /// Card rows for one user.
    fn cards(&self, user_id: u32) -> Result<DataFrame>;

    /// Deck rows for one user.
    fn decks(&self, user_id: u32) -> Result<DataFrame>;
}

/// Store backed by parquet relations under a dataset root.
///
/// A relation may be a directory of parquet files (`<root>/revlogs/*.parquet`)
/// or a single file (`<root>/revlogs.parquet`).
pub struct ParquetStore {
    root: PathBuf,
}

impl ParquetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn scan(&self, relation: &str, user_id: u32) -> Result<DataFrame> {
        let dir = self.root.join(relation);
        let path = if dir.is_dir() {
            dir.join("*.parquet")
        } else {
            self.root.join(format!("{relation}.parquet"))
        };

        let df = LazyFrame::scan_parquet(&path, ScanArgsParquet::default())?
            .filter(col("user_id").eq(lit(user_id as i64)))
            .collect()?;
        Ok(df)
    }
}

impl StudyStore for ParquetStore {
    fn revlogs(&self, user_id: u32) -> Result<DataFrame> {
        self.scan("revlogs", user_id)
    }

    fn cards(&self, user_id: u32) -> Result<DataFrame> {
        self.scan("cards", user_id)
    }

    fn decks(&self, user_id: u32) -> Result<DataFrame> {
        self.scan("decks", user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::TempDir;

    fn write_parquet(path: &std::path::Path, mut df: DataFrame) {
        ParquetWriter::new(File::create(path).unwrap())
            .finish(&mut df)
            .unwrap();
    }

    #[test]
    fn test_scan_single_file_relation() {
        let temp_dir = TempDir::new().unwrap();
        let df = df!(
            "user_id" => [1i64, 1, 2],
            "card_id" => [10i64, 11, 12],
        )
        .unwrap();
        write_parquet(&temp_dir.path().join("cards.parquet"), df);

        let store = ParquetStore::new(temp_dir.path());
        let cards = store.cards(1).unwrap();
        assert_eq!(cards.height(), 2);

        let cards = store.cards(2).unwrap();
        assert_eq!(cards.height(), 1);
    }

    #[test]
    fn test_scan_directory_relation() {
        let temp_dir = TempDir::new().unwrap();
        let decks_dir = temp_dir.path().join("decks");
        fs::create_dir(&decks_dir).unwrap();
        let df = df!(
            "user_id" => [1i64, 3],
            "deck_id" => [100i64, 101],
        )
        .unwrap();
        write_parquet(&decks_dir.join("part-0.parquet"), df);

        let store = ParquetStore::new(temp_dir.path());
        let decks = store.decks(3).unwrap();
        assert_eq!(decks.height(), 1);
    }

    #[test]
    fn test_missing_relation_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = ParquetStore::new(temp_dir.path());
        assert!(store.revlogs(1).is_err());
    }
}
