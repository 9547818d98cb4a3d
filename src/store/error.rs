// SQRL Store - Store error types
//
// No variant carries identity secret material. Validation errors report
// positions and lengths only, never the offending key.

use thiserror::Error;

use crate::hygiene::WrapperDestroyed;

/// Reasons an identity key is rejected before any I/O.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Identity key is empty")]
    EmptyKey,

    #[error("Identity key is {len} bytes, maximum is {max}")]
    KeyTooLong { len: usize, max: usize },

    #[error("Identity key contains a disallowed character at byte {position}")]
    InvalidFormat { position: usize },
}

/// Failures reported by a storage engine.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Row not found")]
    RowNotFound,

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Operation deadline exceeded")]
    DeadlineExceeded,

    #[error("Backend error: {0}")]
    Backend(String),
}

impl StorageError {
    /// The engine's "no such row" outcome, which the store reports as `NotFound`.
    pub fn is_row_not_found(&self) -> bool {
        matches!(
            self,
            StorageError::RowNotFound | StorageError::Database(rusqlite::Error::QueryReturnedNoRows)
        )
    }

    /// Cancellation or deadline expiry, as opposed to an engine fault.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, StorageError::Cancelled | StorageError::DeadlineExceeded)
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid identity key: {0}")]
    Validation(#[from] ValidationError),

    #[error("No identity supplied")]
    NilInput,

    #[error("Identity not found")]
    NotFound,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error(transparent)]
    WrapperDestroyed(#[from] WrapperDestroyed),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound)
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

// ─── Tests ───────────────────────────────────────────────────────────────────
