//! I/O module
//!
//! Handles the accounts CSV consumed and produced by the binary.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (record conversion, output serialization)
//! - `accounts_reader` - Loads the accounts file into `Account` values

pub mod accounts_reader;
pub mod csv_format;

pub use accounts_reader::read_accounts;
pub use csv_format::{convert_csv_record, write_accounts_csv, CsvAccountRecord};
