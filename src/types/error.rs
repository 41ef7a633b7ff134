//! Error types for the bank transfer library
//!
//! This module defines all error types that can occur while moving funds
//! between two accounts and persisting the result.
//!
//! # Error Categories
//!
//! - **Input Errors**: Negative amounts, self-transfers, unknown accounts
//! - **Business Rule Errors**: Withdrawals refused by the account policy
//! - **Persistence Errors**: Store begin/update/commit/rollback failures
//! - **Cleanup Errors**: Failures releasing transaction resources (logged only)
//! - **File I/O Errors**: Accounts file not found, malformed CSV (CLI only)

use crate::types::account::AccountId;
use thiserror::Error;

/// Main error type for the transfer library
///
/// Every failure a transfer can hit is one of these variants. The
/// [`TransferService`](crate::core::TransferService) never lets one escape:
/// it converts them into a [`TransferOutcome`](crate::types::TransferOutcome).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    /// Malformed input (negative amount, self-transfer, unknown account)
    ///
    /// Rejected before any state change.
    #[error("Invalid argument: {detail}")]
    InvalidArgument {
        /// Description of what was wrong with the input
        detail: String,
    },

    /// Withdrawal refused by the account's policy
    ///
    /// Reported as `Rejected`; nothing was mutated so no compensation is needed.
    #[error("Policy violation on account {account}: {detail}")]
    PolicyViolation {
        /// Account whose policy refused the withdrawal
        account: AccountId,
        /// Human readable reason
        detail: String,
    },

    /// Store update, commit or rollback error
    ///
    /// Reported as `RolledBack`; triggers in-memory compensation.
    #[error("Persistence failure: {detail}")]
    PersistenceFailure {
        /// Description of the store failure
        detail: String,
    },

    /// Failure releasing transaction resources after the outcome was decided
    ///
    /// Logged only, never changes the reported outcome.
    #[error("Resource cleanup failure: {detail}")]
    ResourceCleanupFailure {
        /// Description of the cleanup failure
        detail: String,
    },

    /// Balance arithmetic would overflow the decimal range
    #[error("Arithmetic overflow in {operation} for account {account}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// Account ID
        account: AccountId,
    },

    /// File not found at the specified path
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing error occurred
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },
}

impl From<std::io::Error> for TransferError {
    fn from(error: std::io::Error) -> Self {
        TransferError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for TransferError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        TransferError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

impl From<duckdb::Error> for TransferError {
    fn from(error: duckdb::Error) -> Self {
        TransferError::PersistenceFailure {
            detail: error.to_string(),
        }
    }
}

impl TransferError {
    /// Create an InvalidArgument error
    pub fn invalid_argument(detail: impl Into<String>) -> Self {
        TransferError::InvalidArgument {
            detail: detail.into(),
        }
    }

    /// Create a PolicyViolation error
    pub fn policy_violation(account: AccountId, detail: impl Into<String>) -> Self {
        TransferError::PolicyViolation {
            account,
            detail: detail.into(),
        }
    }

    /// Create a PersistenceFailure error
    pub fn persistence(detail: impl Into<String>) -> Self {
        TransferError::PersistenceFailure {
            detail: detail.into(),
        }
    }

    /// Create a ResourceCleanupFailure error
    pub fn cleanup(detail: impl Into<String>) -> Self {
        TransferError::ResourceCleanupFailure {
            detail: detail.into(),
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, account: AccountId) -> Self {
        TransferError::ArithmeticOverflow {
            operation: operation.to_string(),
            account,
        }
    }
}
