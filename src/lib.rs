//! # revstats
//!
//! Compute per-user study statistics from a columnar dataset of
//! spaced-repetition review logs, flashcards, and decks.
//!
//! For each user id, the per-user pipeline loads that user's rows from the
//! three relations, inner-joins them, and derives summary metrics (review
//! counts, distinct card/note counts, average reviews per note/card, and a
//! retention rate). Many users are processed concurrently and the surviving
//! results are persisted as line-delimited JSON.
//!
//! ## Modules
//!
//! - `batch` - Concurrent per-user fan-out and JSONL persistence
//! - `cli` - User-id spec parsing for the command line
//! - `error` - Crate error types
//! - `pipeline` - Per-user extract-join pipeline over the three relations
//! - `stats` - Summary statistics over the joined frame
//! - `store` - Columnar store access behind the `StudyStore` trait
//! - `testing` - Testing utilities and fixtures
pub mod batch;
pub mod cli;
pub mod error;
pub mod pipeline;
pub mod stats;
pub mod store;

pub mod testing;
