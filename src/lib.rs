//! Bank Transfer Library
//! # Overview
//!
//! This library moves funds between two accounts, enforcing a minimum balance
//! rule in application logic and persisting both new balances in a single
//! store transaction.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (Account, AccountPolicy, TransferOutcome, errors)
//! - [`core`] - Business logic components:
//!   - [`core::transfer`] - The transfer protocol and its compensation logic
//!   - [`core::traits`] - The `Store` abstraction
//!   - [`core::memory_store`] / [`core::duckdb_store`] - Store adapters
//! - [`io`] - Accounts CSV input and output
//! - [`cli`] / [`app`] / [`logging`] - The `bank-transfer` binary surface
//!
//! # Outcomes
//!
//! Every transfer ends in exactly one [`TransferOutcome`]:
//!
//! - **Committed**: both balances persisted; memory matches the store
//! - **Rejected**: refused before any mutation (policy violation, invalid input)
//! - **RolledBack**: the store failed; the in-memory mutation was reversed
//!
//! ```
//! use bank_transfer::core::{InMemoryStore, TransferService};
//! use bank_transfer::{Account, TransferOutcome};
//! use rust_decimal::Decimal;
//!
//! let store = InMemoryStore::with_accounts([
//!     (101, Decimal::from(5000)),
//!     (102, Decimal::from(1000)),
//! ]);
//! let mut service = TransferService::new(store);
//! let mut akhil = Account::savings(101, "Akhil", Decimal::from(5000));
//! let mut john = Account::savings(102, "John", Decimal::from(1000));
//!
//! let outcome = service.transfer(&mut akhil, &mut john, Decimal::from(1000));
//!
//! assert_eq!(outcome, TransferOutcome::Committed);
//! assert_eq!(akhil.balance(), Decimal::from(4000));
//! assert_eq!(john.balance(), Decimal::from(2000));
//! ```

// Module declarations
pub mod app;
pub mod cli;
pub mod core;
pub mod io;
pub mod logging;
pub mod types;

pub use crate::core::{DuckDbStore, InMemoryStore, Store, TransferConfig, TransferService};
pub use io::write_accounts_csv;
pub use types::{
    Account, AccountId, AccountPolicy, TransferError, TransferOutcome, TransferRequest,
    TransferState,
};
