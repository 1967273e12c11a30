//! Store errors

use thiserror::Error;

/// Account store errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// Record not found
    #[error("record not found")]
    NotFound,

    /// Backend unavailable or misbehaving
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Result alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;
