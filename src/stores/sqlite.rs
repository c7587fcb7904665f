//! Implements a SQLite backed ledger row store.
use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row, types::Type};
use uuid::Uuid;

use crate::{
    Error,
    database_id::TransactionId,
    db::{CreateTable, MapRow},
    stores::TransactionStore,
    transaction::{Transaction, TransactionDraft},
};

const COLUMNS: &str = "id, date, kind, category, account, amount, description, transfer_group_id";

/// Stores ledger rows in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    /// Persist a batch of drafts as one SQL transaction.
    ///
    /// Either every draft is stored or, if any insert fails, none are. Use
    /// this for multi-row batches such as transfers so a half-written
    /// transfer can never reach the ledger.
    ///
    /// # Errors
    /// Returns the first insert error; the database is left unchanged in
    /// that case.
    pub fn insert_all(&mut self, drafts: Vec<TransactionDraft>) -> Result<Vec<Transaction>, Error> {
        let connection = self.connection.lock().unwrap();

        let tx = connection.unchecked_transaction()?;
        let mut transactions = Vec::with_capacity(drafts.len());

        {
            let mut statement = tx.prepare(&format!(
                "INSERT INTO ledger_row (date, kind, category, account, amount, description, transfer_group_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 RETURNING {COLUMNS}"
            ))?;

            for draft in drafts {
                let transaction = statement.query_row(
                    (
                        draft.date,
                        draft.kind,
                        draft.category,
                        draft.account,
                        draft.amount,
                        draft.description,
                        draft.transfer_group_id.map(|group| group.to_string()),
                    ),
                    Self::map_row,
                )?;

                transactions.push(transaction);
            }
        }

        tx.commit()?;

        Ok(transactions)
    }
}

impl TransactionStore for SQLiteTransactionStore {
    /// Create a new ledger row in the database.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error.
    fn insert(&mut self, draft: TransactionDraft) -> Result<Transaction, Error> {
        let connection = self.connection.lock().unwrap();

        let transaction = connection
            .prepare(&format!(
                "INSERT INTO ledger_row (date, kind, category, account, amount, description, transfer_group_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 RETURNING {COLUMNS}"
            ))?
            .query_row(
                (
                    draft.date,
                    draft.kind,
                    draft.category,
                    draft.account,
                    draft.amount,
                    draft.description,
                    draft.transfer_group_id.map(|group| group.to_string()),
                ),
                Self::map_row,
            )?;

        Ok(transaction)
    }

    /// Replace every stored field of the row `id` with the draft's values.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::UpdateMissingTransaction] if `id` does not refer to a stored row,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn update(&mut self, id: TransactionId, draft: TransactionDraft) -> Result<Transaction, Error> {
        let connection = self.connection.lock().unwrap();

        let rows_changed = connection.execute(
            "UPDATE ledger_row
             SET date = ?1, kind = ?2, category = ?3, account = ?4, amount = ?5, description = ?6, transfer_group_id = ?7
             WHERE id = ?8",
            (
                draft.date,
                draft.kind,
                draft.category,
                draft.account,
                draft.amount,
                draft.description,
                draft.transfer_group_id.map(|group| group.to_string()),
                id,
            ),
        )?;

        if rows_changed == 0 {
            return Err(Error::UpdateMissingTransaction);
        }

        let transaction = connection
            .prepare(&format!("SELECT {COLUMNS} FROM ledger_row WHERE id = :id"))?
            .query_row(&[(":id", &id)], Self::map_row)?;

        Ok(transaction)
    }

    /// Remove the row `id` from the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DeleteMissingTransaction] if `id` does not refer to a stored row,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn delete(&mut self, id: TransactionId) -> Result<(), Error> {
        let rows_changed = self
            .connection
            .lock()
            .unwrap()
            .execute("DELETE FROM ledger_row WHERE id = ?1", (id,))?;

        if rows_changed == 0 {
            return Err(Error::DeleteMissingTransaction);
        }

        Ok(())
    }

    /// Retrieve a ledger row in the database by its `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a stored row,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn get(&self, id: TransactionId) -> Result<Transaction, Error> {
        let transaction = self
            .connection
            .lock()
            .unwrap()
            .prepare(&format!("SELECT {COLUMNS} FROM ledger_row WHERE id = :id"))?
            .query_row(&[(":id", &id)], Self::map_row)?;

        Ok(transaction)
    }

    /// Retrieve every ledger row in the database.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error.
    fn select_all(&self) -> Result<Vec<Transaction>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(&format!("SELECT {COLUMNS} FROM ledger_row"))?
            .query_map((), Self::map_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::SqlError))
            .collect()
    }
}

impl CreateTable for SQLiteTransactionStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        // AUTOINCREMENT keeps row ids strictly increasing, so an id is
        // never reused after a delete.
        connection.execute(
            "CREATE TABLE IF NOT EXISTS ledger_row (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    date TEXT NOT NULL,
                    kind TEXT NOT NULL,
                    category TEXT NOT NULL,
                    account TEXT NOT NULL,
                    amount INTEGER NOT NULL CHECK (amount >= 0),
                    description TEXT NOT NULL,
                    transfer_group_id TEXT
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteTransactionStore {
    type ReturnType = Transaction;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let transfer_group_id = row
            .get::<usize, Option<String>>(offset + 7)?
            .map(|raw| {
                Uuid::parse_str(&raw).map_err(|error| {
                    rusqlite::Error::FromSqlConversionFailure(
                        offset + 7,
                        Type::Text,
                        Box::new(error),
                    )
                })
            })
            .transpose()?;

        Ok(Transaction {
            id: row.get(offset)?,
            date: row.get(offset + 1)?,
            kind: row.get(offset + 2)?,
            category: row.get(offset + 3)?,
            account: row.get(offset + 4)?,
            amount: row.get(offset + 5)?,
            description: row.get(offset + 6)?,
            transfer_group_id,
        })
    }
}
