//! Transfer service
//!
//! This module provides the `TransferService` that moves funds between two
//! accounts and persists both new balances in one store transaction.
//!
//! # Protocol
//!
//! 1. **PolicyCheck**: the source account's policy authorizes the withdrawal.
//!    A refusal ends the transfer as `Rejected`; nothing was mutated.
//! 2. **MutateLocal**: the destination is credited. Both in-memory balances
//!    are now ahead of the store.
//! 3. **Persisting**: a store transaction is opened and both balances are
//!    written, source first.
//! 4. **Decision**: commit when both updates hit exactly one row, roll back
//!    otherwise.
//!
//! Any failure after step 1 rolls back the open transaction and reverses the
//! in-memory mutation (compensation), so the accounts again match the
//! unchanged store. Every path ends in a [`TransferOutcome`].

use crate::core::traits::{Store, StoreTransaction};
use crate::types::{Account, TransferError, TransferOutcome, TransferRequest, TransferState};
use rust_decimal::Decimal;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Configuration for the transfer service
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferConfig {
    /// Deadline for the persisting phase; exceeding it rolls the transfer back
    ///
    /// Checked once, after both updates have returned and before commit: slow
    /// updates are rolled back instead of committed. A store call that blocks
    /// is never interrupted, so this does not bound how long `transfer` takes.
    /// `None` disables the deadline.
    pub persistence_timeout: Option<Duration>,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            persistence_timeout: Some(Duration::from_secs(5)),
        }
    }
}

impl TransferConfig {
    /// Create a TransferConfig from a timeout in milliseconds
    ///
    /// `None` keeps the default deadline. A zero timeout would roll back every
    /// transfer, so it falls back to the default with a warning.
    pub fn new(persistence_timeout_ms: Option<u64>) -> Self {
        let default = Self::default();

        let persistence_timeout = match persistence_timeout_ms {
            None => default.persistence_timeout,
            Some(0) => {
                warn!(
                    default_ms = default
                        .persistence_timeout
                        .map(|t| t.as_millis() as u64)
                        .unwrap_or_default(),
                    "invalid persistence timeout (0 ms), using default"
                );
                default.persistence_timeout
            }
            Some(ms) => Some(Duration::from_millis(ms)),
        };

        Self {
            persistence_timeout,
        }
    }

    /// Configuration without a persistence deadline
    pub fn without_deadline() -> Self {
        Self {
            persistence_timeout: None,
        }
    }
}

/// Orchestrates single transfers against an injected store
///
/// The service owns its store for its whole lifetime; it never owns the
/// accounts, which are borrowed for the duration of one call.
pub struct TransferService<S: Store> {
    store: S,
    config: TransferConfig,
}

impl<S: Store> TransferService<S> {
    /// Create a service with the default configuration
    pub fn new(store: S) -> Self {
        Self::with_config(store, TransferConfig::default())
    }

    /// Create a service with a custom configuration
    pub fn with_config(store: S, config: TransferConfig) -> Self {
        TransferService { store, config }
    }

    /// Shared access to the store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Exclusive access to the store
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Move `amount` from `from` to `to` and persist both balances
    ///
    /// The accounts are mutated in place. On `Committed` they match the
    /// store; on `Rejected` or `RolledBack` they hold their pre-call balances.
    pub fn transfer(
        &mut self,
        from: &mut Account,
        to: &mut Account,
        amount: Decimal,
    ) -> TransferOutcome {
        let request = TransferRequest {
            from: from.id,
            to: to.id,
            amount,
        };
        debug!(%request, state = %TransferState::Start, "transfer requested");

        if let Err(reason) = validate(&request, from, to, self.store.scale()) {
            return rejected(&request, reason);
        }

        debug!(%request, state = %TransferState::PolicyCheck, "authorizing withdrawal");
        if let Err(reason) = from.withdraw(amount) {
            return rejected(&request, reason);
        }

        debug!(%request, state = %TransferState::MutateLocal, "crediting destination");
        if let Err(reason) = to.deposit(amount) {
            from.reverse_withdrawal(amount);
            return rejected(&request, reason);
        }

        debug!(%request, state = %TransferState::Persisting, "persisting balances");
        match self.persist(from, to) {
            Ok(()) => {
                info!(
                    %request,
                    from_balance = %from.balance(),
                    to_balance = %to.balance(),
                    "transfer committed"
                );
                TransferOutcome::Committed
            }
            Err(reason) => {
                from.reverse_withdrawal(amount);
                to.reverse_deposit(amount);
                error!(%request, error = %reason, "transfer rolled back, in-memory balances restored");
                TransferOutcome::RolledBack { reason }
            }
        }
    }

    /// Write both balances inside one store transaction
    ///
    /// Any early return drops the guard, which rolls the transaction back.
    fn persist(&mut self, from: &Account, to: &Account) -> Result<(), TransferError> {
        let started = Instant::now();
        let mut txn = TxnGuard::new(self.store.begin()?);

        let from_rows = txn.update_balance(from.id, from.balance())?;
        let to_rows = txn.update_balance(to.id, to.balance())?;

        if from_rows != 1 || to_rows != 1 {
            txn.rollback();
            return Err(TransferError::persistence(format!(
                "store rejected update (rows affected: account {} = {}, account {} = {})",
                from.id, from_rows, to.id, to_rows
            )));
        }

        if let Some(limit) = self.config.persistence_timeout {
            let elapsed = started.elapsed();
            if elapsed >= limit {
                txn.rollback();
                return Err(TransferError::persistence(format!(
                    "persistence deadline of {:?} exceeded after {:?}",
                    limit, elapsed
                )));
            }
        }

        txn.commit()
    }
}

/// Reject malformed requests before any state is touched
///
/// With a store `scale`, the amount and both balances must fit it: the store
/// would otherwise round what it persists and diverge from memory.
fn validate(
    request: &TransferRequest,
    from: &Account,
    to: &Account,
    scale: Option<u32>,
) -> Result<(), TransferError> {
    if request.amount < Decimal::ZERO {
        return Err(TransferError::invalid_argument(format!(
            "transfer amount must not be negative, got {}",
            request.amount
        )));
    }

    if request.from == request.to {
        return Err(TransferError::invalid_argument(format!(
            "cannot transfer from account {} to itself",
            request.from
        )));
    }

    if let Some(scale) = scale {
        let too_precise = |value: Decimal| value.normalize().scale() > scale;

        if too_precise(request.amount) {
            return Err(TransferError::invalid_argument(format!(
                "transfer amount {} has more than {} decimal places",
                request.amount, scale
            )));
        }

        for account in [from, to] {
            if too_precise(account.balance()) {
                return Err(TransferError::invalid_argument(format!(
                    "balance {} of account {} has more than {} decimal places",
                    account.balance(),
                    account.id,
                    scale
                )));
            }
        }
    }

    Ok(())
}

fn rejected(request: &TransferRequest, reason: TransferError) -> TransferOutcome {
    warn!(%request, error = %reason, "transfer rejected");
    TransferOutcome::Rejected { reason }
}

/// Scoped store transaction
///
/// Guarantees exactly one of commit or rollback reaches the store: a guard
/// dropped while still holding its transaction rolls it back.
struct TxnGuard<'a> {
    txn: Option<Box<dyn StoreTransaction + 'a>>,
}

impl<'a> TxnGuard<'a> {
    fn new(txn: Box<dyn StoreTransaction + 'a>) -> Self {
        Self { txn: Some(txn) }
    }

    fn update_balance(
        &mut self,
        account_id: crate::types::AccountId,
        balance: Decimal,
    ) -> Result<u64, TransferError> {
        match self.txn.as_mut() {
            Some(txn) => txn.update_balance(account_id, balance),
            None => Err(TransferError::persistence("transaction already closed")),
        }
    }

    fn commit(mut self) -> Result<(), TransferError> {
        match self.txn.take() {
            Some(txn) => txn.commit(),
            None => Err(TransferError::persistence("transaction already closed")),
        }
    }

    /// Best-effort rollback; a failure is logged, never returned
    fn rollback(mut self) {
        if let Some(txn) = self.txn.take() {
            rollback_logged(txn);
        }
    }
}

impl Drop for TxnGuard<'_> {
    fn drop(&mut self) {
        if let Some(txn) = self.txn.take() {
            debug!("releasing open transaction");
            rollback_logged(txn);
        }
    }
}

fn rollback_logged(txn: Box<dyn StoreTransaction + '_>) {
    if let Err(e) = txn.rollback() {
        let cleanup = TransferError::cleanup(e.to_string());
        warn!(error = %cleanup, "rollback failed; store discards the transaction");
    }
}
