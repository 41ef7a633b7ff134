//! DuckDB store adapter
//!
//! Persists balances in an `accounts` table through an embedded DuckDB
//! connection. The schema is owned by whoever provisions the database:
//!
//! ```sql
//! CREATE TABLE accounts (acc_id INTEGER PRIMARY KEY, balance DECIMAL(18, 4) NOT NULL);
//! ```
//!
//! Balances cross the driver boundary as decimal text and are cast on the SQL
//! side, so no floating point value is ever involved.

use crate::core::traits::{Store, StoreTransaction};
use crate::types::{AccountId, TransferError};
use duckdb::{params, Connection, OptionalExt, Transaction};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Decimal places of the `balance` column
pub const BALANCE_SCALE: u32 = 4;

const UPDATE_BALANCE_SQL: &str =
    "UPDATE accounts SET balance = CAST(? AS DECIMAL(18, 4)) WHERE acc_id = ?";

const SELECT_BALANCE_SQL: &str = "SELECT CAST(balance AS VARCHAR) FROM accounts WHERE acc_id = ?";

/// Store backed by a DuckDB database
pub struct DuckDbStore {
    conn: Connection,
}

impl DuckDbStore {
    /// Open a database file that already contains the `accounts` table
    pub fn open(path: &Path) -> Result<Self, TransferError> {
        if !path.exists() {
            return Err(TransferError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let conn = Connection::open(path)?;
        debug!(path = %path.display(), "opened duckdb store");
        Ok(Self { conn })
    }

    /// Wrap an already opened connection
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }
}

impl Store for DuckDbStore {
    fn begin(&mut self) -> Result<Box<dyn StoreTransaction + '_>, TransferError> {
        // BEGIN TRANSACTION; autocommit stays off until commit, rollback or drop
        let tx = self.conn.transaction()?;
        Ok(Box::new(DuckDbTransaction { tx }))
    }

    fn balance(&mut self, account_id: AccountId) -> Result<Option<Decimal>, TransferError> {
        let raw: Option<String> = self
            .conn
            .query_row(SELECT_BALANCE_SQL, params![account_id], |row| row.get(0))
            .optional()?;

        raw.map(|text| {
            Decimal::from_str(text.trim()).map_err(|e| {
                TransferError::persistence(format!(
                    "unreadable balance '{}' for account {}: {}",
                    text, account_id, e
                ))
            })
        })
        .transpose()
    }

    fn scale(&self) -> Option<u32> {
        Some(BALANCE_SCALE)
    }
}

/// Open DuckDB transaction
///
/// Dropping the handle without commit rolls the transaction back.
struct DuckDbTransaction<'conn> {
    tx: Transaction<'conn>,
}

impl StoreTransaction for DuckDbTransaction<'_> {
    fn update_balance(
        &mut self,
        account_id: AccountId,
        new_balance: Decimal,
    ) -> Result<u64, TransferError> {
        let rows = self.tx.execute(
            UPDATE_BALANCE_SQL,
            params![new_balance.to_string(), account_id],
        )?;
        Ok(rows as u64)
    }

    fn commit(self: Box<Self>) -> Result<(), TransferError> {
        self.tx.commit()?;
        Ok(())
    }

    fn rollback(self: Box<Self>) -> Result<(), TransferError> {
        self.tx.rollback()?;
        Ok(())
    }
}
