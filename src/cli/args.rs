use crate::core::TransferConfig;
use crate::types::{AccountId, AccountPolicy, SAVINGS_MIN_BALANCE};
use clap::Parser;
use rust_decimal::Decimal;
use std::path::PathBuf;

/// Transfer funds between two accounts and persist the result
#[derive(Parser, Debug)]
#[command(name = "bank-transfer")]
#[command(about = "Transfer funds between two accounts and persist the result", long_about = None)]
pub struct CliArgs {
    /// Accounts CSV file (columns: id, owner, balance)
    #[arg(value_name = "ACCOUNTS", help = "Path to the accounts CSV file")]
    pub accounts_file: PathBuf,

    /// Account to debit
    #[arg(long = "from", value_name = "ID")]
    pub from: AccountId,

    /// Account to credit
    #[arg(long = "to", value_name = "ID")]
    pub to: AccountId,

    /// Amount to transfer
    #[arg(long = "amount", value_name = "AMOUNT", allow_negative_numbers = true)]
    pub amount: Decimal,

    /// Minimum balance every account must keep after a withdrawal
    #[arg(
        long = "min-balance",
        value_name = "AMOUNT",
        help = "Minimum balance kept after a withdrawal (default: 500)"
    )]
    pub min_balance: Option<Decimal>,

    /// Existing DuckDB database to persist to (in-memory store when omitted)
    #[arg(
        long = "db",
        value_name = "PATH",
        help = "DuckDB database with an accounts table; balances are kept in memory when omitted"
    )]
    pub db: Option<PathBuf>,

    /// Deadline for the persisting phase in milliseconds
    #[arg(
        long = "timeout-ms",
        value_name = "MS",
        help = "Persistence deadline in milliseconds (default: 5000)"
    )]
    pub timeout_ms: Option<u64>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,
}

impl CliArgs {
    /// Withdrawal policy applied to every loaded account
    pub fn policy(&self) -> AccountPolicy {
        AccountPolicy::MinimumBalance {
            floor: self.min_balance.unwrap_or(SAVINGS_MIN_BALANCE),
        }
    }

    /// Create a TransferConfig from CLI arguments
    pub fn to_transfer_config(&self) -> TransferConfig {
        TransferConfig::new(self.timeout_ms)
    }
}
