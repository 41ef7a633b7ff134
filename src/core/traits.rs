//! Core traits for the backing store
//!
//! This module defines the trait abstractions that let the transfer service
//! run against any transactional store: the in-memory adapter used in tests
//! and the DuckDB adapter used against a real database.

use crate::types::{AccountId, TransferError};
use rust_decimal::Decimal;

/// Backing store holding the persisted account balances
///
/// The store is opened by the surrounding service and injected into the
/// [`TransferService`](crate::core::TransferService), which owns it for its
/// lifetime. Only one transaction is ever open at a time.
pub trait Store {
    /// Open a transactional context
    ///
    /// Writes issued through the returned handle are invisible to readers of
    /// the store until [`StoreTransaction::commit`] succeeds.
    fn begin(&mut self) -> Result<Box<dyn StoreTransaction + '_>, TransferError>;

    /// Read the committed balance of an account, `None` if the id is unknown
    fn balance(&mut self, account_id: AccountId) -> Result<Option<Decimal>, TransferError>;

    /// Number of decimal places the store keeps, `None` if balances are stored exactly
    ///
    /// Values with more places would be rounded on write, so the service
    /// refuses them up front.
    fn scale(&self) -> Option<u32> {
        None
    }
}

/// An open store transaction
///
/// Exactly one of `commit` or `rollback` consumes the handle. A handle dropped
/// without either must discard its writes.
pub trait StoreTransaction {
    /// Set the balance of `account_id`
    ///
    /// Returns the number of rows affected: `1` when the account exists, `0`
    /// when the id is unknown to the store. An unknown id is not an error.
    fn update_balance(
        &mut self,
        account_id: AccountId,
        new_balance: Decimal,
    ) -> Result<u64, TransferError>;

    /// Make every update issued through this handle durable
    fn commit(self: Box<Self>) -> Result<(), TransferError>;

    /// Discard every update issued through this handle
    fn rollback(self: Box<Self>) -> Result<(), TransferError>;
}
