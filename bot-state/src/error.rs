//! Storage error types.
//!
//! Used by storage backends and converted into [`bot_core::BotError::State`] at the turn boundary.

use bot_core::BotError;
use thiserror::Error;

/// Errors that can occur when using storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("eTag conflict on key {key}")]
    ETagConflict { key: String },
}

impl From<sqlx::Error> for StorageError {
    fn from(e: sqlx::Error) -> Self {
        StorageError::Database(e.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Serialization(e.to_string())
    }
}

impl From<StorageError> for BotError {
    fn from(e: StorageError) -> Self {
        BotError::State(e.to_string())
    }
}
