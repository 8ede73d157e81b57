//! # Error Module
//!
//! One error type for every core operation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A validation failure on one input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field name as the client sent it (camelCase).
    pub field: String,
    /// Human readable reason.
    pub message: String,
}

impl FieldError {
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors produced by the board engine.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A board, layout, or other row was not found.
    #[error("{what} not found: {key}")]
    NotFound { what: &'static str, key: String },

    /// A unique key is already taken.
    #[error("{what} already exists: {key}")]
    Conflict { what: &'static str, key: String },

    /// One or more input fields failed validation.
    #[error("validation failed ({} field(s))", .0.len())]
    Validation(Vec<FieldError>),

    /// An option path is empty or has an empty segment.
    #[error("invalid option path: {0:?}")]
    InvalidPath(String),

    /// An option path walks through or overwrites a value of the wrong shape.
    #[error("option path conflict at {0:?}")]
    PathConflict(String),

    /// A stored option value does not match its declared kind.
    #[error("invalid option value at {path:?}: {reason}")]
    InvalidOptionValue { path: String, reason: String },

    /// A legacy board config could not be parsed.
    #[error("legacy config error: {0}")]
    LegacyFormat(String),

    /// The embedded database failed.
    #[error("storage error: {0}")]
    Storage(#[from] redb::Error),

    /// A row could not be encoded or decoded.
    #[error("encoding error: {0}")]
    Encoding(#[from] postcard::Error),
}

impl CoreError {
    pub(crate) fn not_found(what: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            what,
            key: key.to_string(),
        }
    }

    pub(crate) fn conflict(what: &'static str, key: impl ToString) -> Self {
        Self::Conflict {
            what,
            key: key.to_string(),
        }
    }
}

// redb returns a distinct error type per operation; all of them fold into
// `redb::Error`.
macro_rules! storage_error_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for CoreError {
                fn from(err: $ty) -> Self {
                    Self::Storage(redb::Error::from(err))
                }
            }
        )*
    };
}

storage_error_from!(
    redb::DatabaseError,
    redb::TransactionError,
    redb::TableError,
    redb::StorageError,
    redb::CommitError,
);

/// Result alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
