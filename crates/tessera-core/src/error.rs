use thiserror::Error;

use crate::id::{TableId, TransactionId};
use crate::types::Type;

/// Canonical result for core.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// Unknown field index or name. Carries the queried name (or index) verbatim.
    #[error("No such field: {0}")]
    NoSuchField(String),

    #[error("Field index {index} out of range for tuple with {len} fields")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Type mismatch at field {index}: expected {expected}, found {found}")]
    TypeMismatch {
        index: usize,
        expected: Type,
        found: Type,
    },

    #[error("Value at field {index} is {len} bytes, longer than the {max}-byte maximum")]
    ValueTooLong {
        index: usize,
        len: usize,
        max: usize,
    },

    #[error("No such table: {0}")]
    NoSuchTable(String),

    // Raised by buffer managers and storage handles; the core never produces
    // these itself, it only carries them up the operator tree.
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Transaction {0} aborted")]
    TransactionAborted(TransactionId),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Hashing error: {0}")]
    Hash(String),
}

impl Error {
    pub fn no_such_table(id: TableId) -> Self {
        Error::NoSuchTable(id.to_string())
    }

    /// True when the error signals that the enclosing transaction must stop.
    pub fn is_transaction_aborted(&self) -> bool {
        matches!(self, Error::TransactionAborted(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Hash(e.to_string())
    }
}
