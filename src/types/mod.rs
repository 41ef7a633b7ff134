//! Types module
//!
//! Contains core data structures used throughout the library.
//! This module organizes types into logical submodules:
//! - `account`: Account entity and withdrawal policy
//! - `transfer`: Transfer request, protocol states and outcome
//! - `error`: Error types for the transfer library

pub mod account;
pub mod error;
pub mod transfer;

pub use account::{Account, AccountId, AccountPolicy, SAVINGS_MIN_BALANCE};
pub use error::TransferError;
pub use transfer::{TransferOutcome, TransferRequest, TransferState};
