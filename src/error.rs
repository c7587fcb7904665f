//! Defines the crate-level error types: recoverable validation failures from
//! the composer and failures from the persistence layer.

use crate::transaction::TransactionKind;

/// A rejected transaction intent.
///
/// Validation failures are detected before any persistence is attempted, so
/// a `ValidationError` guarantees that no side effects occurred.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ValidationError {
    /// The user-supplied amount string could not be read as an integer.
    #[error("\"{input}\" is not a number, enter digits only (dots as thousands separators are fine)")]
    NotANumber {
        /// The offending input, trimmed.
        input: String,
    },

    /// A zero or negative amount was supplied where a positive one is
    /// required.
    #[error("the amount must be greater than 0")]
    NonPositiveAmount,

    /// A transfer named the same account as both source and destination.
    #[error("a transfer must use two different accounts, but both were \"{0}\"")]
    SameAccountTransfer(String),

    /// A negative admin fee was supplied. A fee of zero means "no fee".
    #[error("the admin fee cannot be negative")]
    NegativeFee,

    /// The category is not in the configured set for the intent's kind.
    #[error("\"{category}\" is not a valid category for kind {kind}")]
    UnknownCategory {
        /// The rejected category label.
        category: String,
        /// The kind whose category set was consulted.
        kind: TransactionKind,
    },

    /// The account is not in the configured account set.
    #[error("\"{0}\" is not a known account")]
    UnknownAccount(String),
}

/// The errors that may occur outside intent validation.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A transaction intent was rejected before any I/O took place.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The requested row could not be found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested row could not be found")]
    NotFound,

    /// Tried to update a ledger row that does not exist.
    #[error("tried to update a ledger row that is not in the database")]
    UpdateMissingTransaction,

    /// Tried to delete a ledger row that does not exist.
    #[error("tried to delete a ledger row that is not in the database")]
    DeleteMissingTransaction,

    /// The ledger config file could not be read or parsed.
    #[error("could not load the ledger config from {path}: {reason}")]
    ConfigLoad {
        /// The path that was read.
        path: String,
        /// What went wrong, as reported by the filesystem or parser.
        reason: String,
    },

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}
