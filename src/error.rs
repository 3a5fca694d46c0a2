use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("DataFrame error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("No {relation} found for user {user_id}")]
    NotFound { user_id: u32, relation: &'static str },

    #[error("Error loading data for user {user_id}: {message}")]
    Load { user_id: u32, message: String },

    #[error("Error processing user {user_id}: {message}")]
    Aggregation { user_id: u32, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
