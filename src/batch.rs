//! Persists a composed batch of drafts through any [TransactionStore],
//! unwinding on failure.
//!
//! The SQLite store offers a native atomic batch insert; this helper exists
//! for store implementations without one. It inserts drafts one at a time
//! and, when an insert fails, deletes the rows it already wrote so a
//! partial transfer never lingers in the ledger.

use tracing::error;

use crate::{
    Error,
    database_id::TransactionId,
    stores::TransactionStore,
    transaction::{Transaction, TransactionDraft},
};

/// The error left behind when a batch could not be fully persisted.
///
/// `persisted` holds the rows that are still in the store because the
/// unwinding delete failed for them; when it is empty, the store was
/// restored to its pre-batch state.
#[derive(Debug, thiserror::Error)]
#[error(
    "failed to persist draft {failed_index} of {total}: rolled back {unwound} inserted rows, {left} left in store",
    unwound = .rolled_back.len(),
    left = .persisted.len()
)]
pub struct PartialBatchFailure {
    /// Rows that were inserted but could not be deleted during unwinding.
    pub persisted: Vec<Transaction>,
    /// Ids of the rows that were inserted and then successfully deleted.
    pub rolled_back: Vec<TransactionId>,
    /// The position of the draft whose insert failed.
    pub failed_index: usize,
    /// How many drafts the batch held.
    pub total: usize,
    /// The insert error that stopped the batch.
    #[source]
    pub source: Error,
}

/// Persist `drafts` in order, treating the batch as all-or-nothing.
///
/// On success every draft was stored and the assigned rows are returned in
/// draft order. On failure the already-inserted rows are deleted again on a
/// best-effort basis; inspect [PartialBatchFailure::persisted] for rows the
/// unwinding could not remove.
///
/// # Errors
/// Returns a [PartialBatchFailure] wrapping the insert error that stopped
/// the batch.
pub fn persist_drafts<S: TransactionStore>(
    store: &mut S,
    drafts: Vec<TransactionDraft>,
) -> Result<Vec<Transaction>, PartialBatchFailure> {
    let total = drafts.len();
    let mut persisted: Vec<Transaction> = Vec::with_capacity(total);

    for (index, draft) in drafts.into_iter().enumerate() {
        match store.insert(draft) {
            Ok(transaction) => persisted.push(transaction),
            Err(source) => {
                let mut rolled_back = Vec::with_capacity(persisted.len());
                let mut left_behind = Vec::new();

                for transaction in persisted {
                    match store.delete(transaction.id) {
                        Ok(()) => rolled_back.push(transaction.id),
                        Err(delete_error) => {
                            error!(
                                "could not unwind ledger row {}: {delete_error}",
                                transaction.id
                            );
                            left_behind.push(transaction);
                        }
                    }
                }

                return Err(PartialBatchFailure {
                    persisted: left_behind,
                    rolled_back,
                    failed_index: index,
                    total,
                    source,
                });
            }
        }
    }

    Ok(persisted)
}
