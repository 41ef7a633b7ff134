//! CSV format handling for account records
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvAccountRecord structure for deserialization
//! - Conversion from CSV records to domain accounts
//! - Account output serialization
//!
//! All functions are pure (no file I/O) for easy testing.

use crate::types::{Account, AccountId, AccountPolicy, TransferError};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// Decimal places balances are padded to on output
const OUTPUT_SCALE: u32 = 4;

/// CSV record structure for deserialization
///
/// Matches the accounts file format with columns: id, owner, balance.
/// The balance is kept as text so it never passes through a float.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvAccountRecord {
    pub id: AccountId,
    pub owner: String,
    pub balance: String,
}

/// Convert a CsvAccountRecord to an Account carrying `policy`
///
/// # Errors
///
/// Returns `InvalidArgument` if the balance is not a decimal number.
pub fn convert_csv_record(
    record: CsvAccountRecord,
    policy: AccountPolicy,
) -> Result<Account, TransferError> {
    let balance = Decimal::from_str(record.balance.trim()).map_err(|_| {
        TransferError::invalid_argument(format!(
            "invalid balance '{}' for account {}",
            record.balance, record.id
        ))
    })?;

    Ok(Account::new(record.id, record.owner, balance, policy))
}

/// Write accounts to CSV format
///
/// Writes accounts with columns: id, owner, balance. Balances are padded to
/// four decimal places; finer balances are written in full, never rounded.
/// Accounts are sorted by ID for deterministic output.
pub fn write_accounts_csv(
    accounts: &[Account],
    output: &mut dyn Write,
) -> Result<(), TransferError> {
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record(["id", "owner", "balance"])?;

    let mut sorted: Vec<&Account> = accounts.iter().collect();
    sorted.sort_by_key(|account| account.id);

    for account in sorted {
        writer.write_record(&[
            account.id.to_string(),
            account.owner.clone(),
            format_balance(account.balance()),
        ])?;
    }

    writer.flush()?;

    Ok(())
}

fn format_balance(mut balance: Decimal) -> String {
    if balance.scale() < OUTPUT_SCALE {
        balance.rescale(OUTPUT_SCALE);
    }
    balance.to_string()
}
