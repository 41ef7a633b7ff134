//! Core business logic module
//!
//! This module contains the transfer protocol and the stores it persists to:
//! - `traits` - Store abstractions the service is written against
//! - `transfer` - Transfer orchestration (policy check, mutation, persistence, compensation)
//! - `memory_store` - In-memory store with fault injection
//! - `duckdb_store` - SQL store over an embedded DuckDB connection

pub mod duckdb_store;
pub mod memory_store;
pub mod traits;
pub mod transfer;

pub use duckdb_store::DuckDbStore;
pub use memory_store::{Fault, InMemoryStore, StoreStats};
pub use traits::{Store, StoreTransaction};
pub use transfer::{TransferConfig, TransferService};
