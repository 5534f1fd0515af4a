//! Error types for gamehub-storage

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StorageError>;

/// Any failure at this layer means "store unavailable" to callers.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
