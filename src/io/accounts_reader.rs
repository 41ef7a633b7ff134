//! Accounts file reader
//!
//! Loads every row of an accounts CSV (`id,owner,balance`) into an
//! [`Account`]. Unlike a transaction stream, the file is small and must be
//! entirely valid: the first bad row aborts the load with its line number.

use crate::io::csv_format::{convert_csv_record, CsvAccountRecord};
use crate::types::{Account, AccountPolicy, TransferError};
use csv::{ReaderBuilder, Trim};
use std::collections::HashSet;
use std::fs::File;
use std::path::Path;

/// Read all accounts from `path`, attaching `policy` to each
///
/// # Errors
///
/// - `FileNotFound` if the file does not exist
/// - `ParseError` for malformed rows, invalid balances and duplicate IDs
pub fn read_accounts(path: &Path, policy: AccountPolicy) -> Result<Vec<Account>, TransferError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => TransferError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => TransferError::from(e),
    })?;

    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(file);

    let mut accounts = Vec::new();
    let mut seen = HashSet::new();

    for (index, result) in reader.deserialize::<CsvAccountRecord>().enumerate() {
        // Header is line 1
        let line = index as u64 + 2;
        let record = result?;

        if !seen.insert(record.id) {
            return Err(TransferError::ParseError {
                line: Some(line),
                message: format!("duplicate account id {}", record.id),
            });
        }

        let account = convert_csv_record(record, policy).map_err(|e| TransferError::ParseError {
            line: Some(line),
            message: e.to_string(),
        })?;
        accounts.push(account);
    }

    Ok(accounts)
}
