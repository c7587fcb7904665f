//! Defines the ledger row store trait.

use crate::{
    Error,
    database_id::TransactionId,
    transaction::{Transaction, TransactionDraft},
};

/// Handles the persistence and retrieval of ledger rows.
pub trait TransactionStore {
    /// Persist a draft as a new ledger row and return the stored row with
    /// its assigned id.
    fn insert(&mut self, draft: TransactionDraft) -> Result<Transaction, Error>;

    /// Replace every stored field of the row `id` with the draft's values,
    /// returning the updated row.
    ///
    /// Implementers must return [Error::UpdateMissingTransaction] when `id`
    /// does not refer to a stored row.
    fn update(&mut self, id: TransactionId, draft: TransactionDraft) -> Result<Transaction, Error>;

    /// Remove the row `id` from the store.
    ///
    /// Implementers must return [Error::DeleteMissingTransaction] when `id`
    /// does not refer to a stored row.
    fn delete(&mut self, id: TransactionId) -> Result<(), Error>;

    /// Retrieve a single ledger row from the store.
    fn get(&self, id: TransactionId) -> Result<Transaction, Error>;

    /// Retrieve every ledger row in the store.
    fn select_all(&self) -> Result<Vec<Transaction>, Error>;
}
