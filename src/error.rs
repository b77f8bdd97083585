//! Failure kinds produced by lifecycle operations.
//!
//! Every variant carries a stable, human-readable reason that the HTTP layer
//! passes through to API error bodies unchanged (storage failures excepted,
//! which are logged and sanitized).

use rusqlite::ffi;

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// A referenced id or composite key is absent.
    #[error("{0}")]
    NotFound(&'static str),

    /// A uniqueness or guarded-deletion/assignment invariant would be violated.
    #[error("{0}")]
    Conflict(&'static str),

    /// Field constraints (length, positivity) are violated.
    #[error("{0}")]
    Validation(String),

    /// The underlying storage engine failed.
    #[error("storage failure: {0}")]
    Storage(#[from] rusqlite::Error),
}

pub type LedgerResult<T> = Result<T, LedgerError>;

impl LedgerError {
    /// Translate a unique or primary-key violation into `Conflict(reason)`,
    /// passing every other error through as a storage failure.
    pub(crate) fn on_unique_violation(err: rusqlite::Error, reason: &'static str) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _)
                if e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
                    || e.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
            {
                Self::Conflict(reason)
            }
            _ => Self::Storage(err),
        }
    }
}
