//! Contains the trait and SQLite implementation for objects that store ledger rows.

mod transaction;

pub mod sqlite;

pub use sqlite::SQLiteTransactionStore;
pub use transaction::TransactionStore;
