//! FILENAME: app/src/error.rs

use group_engine::GroupEngineError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("List not found: {0}")]
    ListNotFound(String),

    #[error(transparent)]
    DateBound(#[from] GroupEngineError),

    #[error("Data source error: {0}")]
    Source(String),

    #[error("Usage: {0}")]
    Usage(String),
}
