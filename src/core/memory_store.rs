//! In-memory store adapter
//!
//! This module provides the `InMemoryStore`, a `Store` backed by a HashMap of
//! committed balances. Each transaction stages its writes and publishes them
//! only on commit, so a failed or abandoned transaction leaves the committed
//! map untouched.
//!
//! # Fault Injection
//!
//! Failures of a remote store (connection loss during an update, a commit that
//! never reaches the server) are simulated with [`Fault`]s. Injected faults stay
//! armed until [`InMemoryStore::clear_faults`] is called.

use crate::core::traits::{Store, StoreTransaction};
use crate::types::{AccountId, TransferError};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::debug;

/// A simulated store failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Opening a transaction fails
    Begin,
    /// The update with this zero-based index within a transaction fails
    Update {
        /// Index of the failing update (0 = first update)
        index: usize,
    },
    /// Commit fails; staged writes are discarded
    Commit,
    /// Rollback fails; staged writes are still discarded
    Rollback,
}

/// Counters describing how transactions ended
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    /// Transactions opened
    pub begun: usize,
    /// Transactions committed
    pub commits: usize,
    /// Transactions explicitly rolled back
    pub rollbacks: usize,
    /// Transactions dropped without a successful commit or rollback
    pub discarded: usize,
}

/// Store keeping committed balances in memory
#[derive(Debug, Default)]
pub struct InMemoryStore {
    /// Map of account IDs to committed balances
    balances: HashMap<AccountId, Decimal>,
    /// Armed faults
    faults: Vec<Fault>,
    stats: StoreStats,
}

impl InMemoryStore {
    /// Create a store seeded with committed balances
    pub fn with_accounts(accounts: impl IntoIterator<Item = (AccountId, Decimal)>) -> Self {
        InMemoryStore {
            balances: accounts.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Committed balance of an account
    pub fn committed_balance(&self, account_id: AccountId) -> Option<Decimal> {
        self.balances.get(&account_id).copied()
    }

    /// Arm a fault
    pub fn inject(&mut self, fault: Fault) {
        self.faults.push(fault);
    }

    /// Disarm every fault
    pub fn clear_faults(&mut self) {
        self.faults.clear();
    }

    /// Transaction counters
    pub fn stats(&self) -> StoreStats {
        self.stats
    }

    fn is_armed(&self, fault: Fault) -> bool {
        self.faults.contains(&fault)
    }
}

impl Store for InMemoryStore {
    fn begin(&mut self) -> Result<Box<dyn StoreTransaction + '_>, TransferError> {
        if self.is_armed(Fault::Begin) {
            return Err(TransferError::persistence(
                "connection lost while opening transaction",
            ));
        }

        self.stats.begun += 1;
        Ok(Box::new(InMemoryTransaction {
            store: self,
            staged: Vec::new(),
            updates: 0,
            finished: false,
        }))
    }

    fn balance(&mut self, account_id: AccountId) -> Result<Option<Decimal>, TransferError> {
        Ok(self.committed_balance(account_id))
    }
}

/// Transaction over an [`InMemoryStore`]
struct InMemoryTransaction<'a> {
    store: &'a mut InMemoryStore,
    /// Writes published on commit, in issue order
    staged: Vec<(AccountId, Decimal)>,
    /// Number of updates issued so far
    updates: usize,
    finished: bool,
}

impl StoreTransaction for InMemoryTransaction<'_> {
    fn update_balance(
        &mut self,
        account_id: AccountId,
        new_balance: Decimal,
    ) -> Result<u64, TransferError> {
        let index = self.updates;
        self.updates += 1;

        if self.store.is_armed(Fault::Update { index }) {
            return Err(TransferError::persistence(format!(
                "connection lost during update #{} (account {})",
                index, account_id
            )));
        }

        if !self.store.balances.contains_key(&account_id) {
            return Ok(0);
        }

        self.staged.push((account_id, new_balance));
        Ok(1)
    }

    fn commit(mut self: Box<Self>) -> Result<(), TransferError> {
        if self.store.is_armed(Fault::Commit) {
            return Err(TransferError::persistence("connection lost during commit"));
        }

        let staged = std::mem::take(&mut self.staged);
        debug!(writes = staged.len(), "in-memory commit");
        for (account_id, balance) in staged {
            self.store.balances.insert(account_id, balance);
        }

        self.store.stats.commits += 1;
        self.finished = true;
        Ok(())
    }

    fn rollback(mut self: Box<Self>) -> Result<(), TransferError> {
        if self.store.is_armed(Fault::Rollback) {
            return Err(TransferError::persistence("connection lost during rollback"));
        }

        debug!(writes = self.staged.len(), "in-memory rollback");
        self.staged.clear();
        self.store.stats.rollbacks += 1;
        self.finished = true;
        Ok(())
    }
}

impl Drop for InMemoryTransaction<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.store.stats.discarded += 1;
        }
    }
}
