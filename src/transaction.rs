//! Defines the ledger row, the row draft emitted by the composer, and the
//! transaction kind with its fixed wire labels.

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

use crate::database_id::TransactionId;

/// The category recorded on both principal legs of a transfer.
pub const CATEGORY_TOP_UP: &str = "Top Up";

/// The category recorded on the fee leg of a transfer.
pub const CATEGORY_ADMIN_FEE: &str = "Biaya Admin";

/// Whether a ledger row moves money into or out of an account.
///
/// The wire labels `Masuk` (inflow) and `Keluar` (outflow) are the stored
/// data's contract and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    /// Money entering an account.
    #[serde(rename = "Masuk")]
    Inflow,
    /// Money leaving an account.
    #[serde(rename = "Keluar")]
    Outflow,
}

impl TransactionKind {
    /// The fixed string stored in the `kind` column.
    pub fn label(self) -> &'static str {
        match self {
            TransactionKind::Inflow => "Masuk",
            TransactionKind::Outflow => "Keluar",
        }
    }

    /// Parse a wire label back into a kind.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Masuk" => Some(TransactionKind::Inflow),
            "Keluar" => Some(TransactionKind::Outflow),
            _ => None,
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.label().into())
    }
}

impl FromSql for TransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let label = value.as_str()?;
        TransactionKind::from_label(label).ok_or_else(|| {
            FromSqlError::Other(format!("\"{label}\" is not a valid transaction kind").into())
        })
    }
}

/// A single persisted ledger row: one movement of money on one account.
///
/// Rows are immutable once created except through a whole-row replace
/// ([TransactionStore::update](crate::stores::TransactionStore::update)).
/// To create new rows, run a [TransactionIntent](crate::TransactionIntent)
/// through [compose](crate::compose) and insert the resulting drafts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the row, assigned by the store on insert and never reused.
    pub id: TransactionId,
    /// The calendar date the money moved.
    pub date: Date,
    /// Whether this row is an inflow or an outflow.
    pub kind: TransactionKind,
    /// The category label, from the closed per-kind category sets.
    pub category: String,
    /// The account the money moved into or out of.
    pub account: String,
    /// The amount in minor currency units (whole rupiah), always positive.
    pub amount: i64,
    /// A free-form description, possibly empty.
    pub description: String,
    /// Shared by all rows composed from one transfer intent, `None` for
    /// simple rows.
    pub transfer_group_id: Option<Uuid>,
}

impl Transaction {
    /// The amount with its direction applied: positive for an inflow,
    /// negative for an outflow.
    pub fn signed_amount(&self) -> i64 {
        match self.kind {
            TransactionKind::Inflow => self.amount,
            TransactionKind::Outflow => -self.amount,
        }
    }

    /// The draft that would recreate this row, used by whole-row edits.
    pub fn to_draft(&self) -> TransactionDraft {
        TransactionDraft {
            date: self.date,
            kind: self.kind,
            category: self.category.clone(),
            account: self.account.clone(),
            amount: self.amount,
            description: self.description.clone(),
            transfer_group_id: self.transfer_group_id,
        }
    }
}

/// A ledger row awaiting persistence; the store assigns the ID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDraft {
    /// The calendar date the money moved.
    pub date: Date,
    /// Whether this row is an inflow or an outflow.
    pub kind: TransactionKind,
    /// The category label.
    pub category: String,
    /// The account the money moved into or out of.
    pub account: String,
    /// The amount in minor currency units, always positive.
    pub amount: i64,
    /// A free-form description, possibly empty.
    pub description: String,
    /// Shared by all drafts composed from one transfer intent.
    pub transfer_group_id: Option<Uuid>,
}


#[cfg(test)]
mod signed_amount_tests {
    use time::macros::date;

    use super::{Transaction, TransactionKind};

    fn row(kind: TransactionKind, amount: i64) -> Transaction {
        Transaction {
            id: 1,
            date: date!(2025 - 06 - 01),
            kind,
            category: "Gaji".to_owned(),
            account: "BCA".to_owned(),
            amount,
            description: String::new(),
            transfer_group_id: None,
        }
    }

    #[test]
    fn inflow_is_positive() {
        assert_eq!(row(TransactionKind::Inflow, 5_000).signed_amount(), 5_000);
    }

    #[test]
    fn outflow_is_negative() {
        assert_eq!(row(TransactionKind::Outflow, 5_000).signed_amount(), -5_000);
    }
}
