//! Database ID type definitions.

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseId = i64;

/// The ID of a persisted ledger row.
pub type TransactionId = DatabaseId;
