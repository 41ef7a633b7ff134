//! Bank Transfer CLI
//!
//! Transfers funds between two accounts loaded from a CSV file and persists the
//! new balances.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- accounts.csv --from 101 --to 102 --amount 1000 > accounts_after.csv
//! cargo run -- accounts.csv --from 101 --to 102 --amount 1000 --db bank.duckdb
//! cargo run -- accounts.csv --from 101 --to 102 --amount 1000 --min-balance 0 --timeout-ms 2000
//! ```
//!
//! The final account states are written to stdout as CSV; logs go to stderr.
//!
//! # Exit Codes
//!
//! - 0: Transfer committed
//! - 1: Error (missing arguments, file not found, unknown account, database unavailable, etc.)
//! - 2: Transfer rejected or rolled back

use bank_transfer::{app, cli, logging};
use std::process;
use tracing::error;

fn main() {
    let args = cli::parse_args();
    logging::init_logging(&args.log_level);

    let mut output = std::io::stdout();
    match app::run(&args, &mut output) {
        Ok(outcome) => {
            if let Some(reason) = outcome.reason() {
                error!(state = %outcome.state(), error = %reason, "transfer did not commit");
                process::exit(2);
            }
        }
        Err(e) => {
            error!(error = %e, "transfer could not run");
            process::exit(1);
        }
    }
}
