//! A single-user cashflow ledger for tracking money across personal
//! accounts.
//!
//! User intents (record an expense, record income, move money between
//! accounts) are composed into one or more ledger rows, persisted in
//! SQLite, and aggregated on demand into per-account balances and
//! per-category totals. Balances are always derived from the full row set
//! rather than stored.

#![warn(missing_docs)]

mod aggregate;
mod amount;
mod batch;
mod compose;
mod config;
mod database_id;
mod db;
mod error;
pub mod stores;
mod transaction;

pub use aggregate::{
    balances_as_of, category_totals, sorted_balances, sorted_category_totals, total_balance,
};
pub use amount::{format_amount, parse_amount};
pub use batch::{PartialBatchFailure, persist_drafts};
pub use compose::{FeeCharge, TransactionIntent, compose, validate_draft};
pub use config::LedgerConfig;
pub use database_id::{DatabaseId, TransactionId};
pub use db::initialize as initialize_db;
pub use error::{Error, ValidationError};
pub use transaction::{
    CATEGORY_ADMIN_FEE, CATEGORY_TOP_UP, Transaction, TransactionDraft, TransactionKind,
};
