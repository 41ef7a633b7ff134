//! Transfer-related types for the bank transfer library
//!
//! This module defines the request, the protocol states a transfer moves
//! through, and the terminal outcome reported to the caller.

use super::account::AccountId;
use super::error::TransferError;
use rust_decimal::Decimal;
use std::fmt;

/// A single transfer attempt
///
/// Ephemeral, never persisted. Carried through the service for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferRequest {
    /// Account debited
    pub from: AccountId,
    /// Account credited
    pub to: AccountId,
    /// Amount moved (non-negative)
    pub amount: Decimal,
}

impl fmt::Display for TransferRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} ({})", self.from, self.to, self.amount)
    }
}

/// Protocol states of a transfer
///
/// ```text
/// Start -> PolicyCheck -> MutateLocal -> Persisting -> Committed
///               |              |             |
///               v              v             v
///           Rejected       Rejected      RolledBack
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferState {
    /// Request received, nothing checked yet
    Start,
    /// Source policy is authorizing the withdrawal
    PolicyCheck,
    /// In-memory balances being updated ahead of persistence
    MutateLocal,
    /// Store transaction open; balances in memory and store diverge
    Persisting,
    /// Terminal: both updates committed
    Committed,
    /// Terminal: store failed, in-memory mutation compensated
    RolledBack,
    /// Terminal: refused before any mutation
    Rejected,
}

impl TransferState {
    /// Get human-readable state name
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferState::Start => "START",
            TransferState::PolicyCheck => "POLICY_CHECK",
            TransferState::MutateLocal => "MUTATE_LOCAL",
            TransferState::Persisting => "PERSISTING",
            TransferState::Committed => "COMMITTED",
            TransferState::RolledBack => "ROLLED_BACK",
            TransferState::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for TransferState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal result of a transfer attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferOutcome {
    /// Both balance updates were persisted
    Committed,
    /// The store failed; the in-memory mutation was reversed
    RolledBack {
        /// Why persistence failed
        reason: TransferError,
    },
    /// Refused before any mutation (policy or invalid input)
    Rejected {
        /// Why the transfer was refused
        reason: TransferError,
    },
}

impl TransferOutcome {
    /// Failure reason, if the transfer did not commit
    pub fn reason(&self) -> Option<&TransferError> {
        match self {
            TransferOutcome::Committed => None,
            TransferOutcome::RolledBack { reason } | TransferOutcome::Rejected { reason } => {
                Some(reason)
            }
        }
    }

    /// Terminal state this outcome corresponds to
    pub fn state(&self) -> TransferState {
        match self {
            TransferOutcome::Committed => TransferState::Committed,
            TransferOutcome::RolledBack { .. } => TransferState::RolledBack,
            TransferOutcome::Rejected { .. } => TransferState::Rejected,
        }
    }
}

impl fmt::Display for TransferOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferOutcome::Committed => write!(f, "committed"),
            TransferOutcome::RolledBack { reason } => write!(f, "rolled back: {}", reason),
            TransferOutcome::Rejected { reason } => write!(f, "rejected: {}", reason),
        }
    }
}
