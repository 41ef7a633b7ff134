//! Application flow behind the `bank-transfer` binary
//!
//! Loads the accounts file, picks a store, runs one transfer and writes the
//! final account state. Kept out of `main.rs` so the whole pipeline can be
//! driven from tests with an in-memory output buffer.

use crate::cli::CliArgs;
use crate::core::{DuckDbStore, InMemoryStore, Store, TransferService};
use crate::io::{read_accounts, write_accounts_csv};
use crate::types::{Account, AccountId, TransferError, TransferOutcome};
use rust_decimal::Decimal;
use std::io::Write;
use tracing::info;

/// Run one transfer as described by `args` and write the accounts to `output`
///
/// # Returns
///
/// * `Ok(TransferOutcome)` - the transfer ran; the outcome may still be a rejection or rollback
/// * `Err(TransferError)` - a fatal error prevented the transfer from running
///
/// # Errors
///
/// - The accounts file is missing or malformed
/// - `--from` or `--to` names an account absent from the file
/// - The database cannot be opened
/// - Output cannot be written
pub fn run(args: &CliArgs, output: &mut dyn Write) -> Result<TransferOutcome, TransferError> {
    let mut accounts = read_accounts(&args.accounts_file, args.policy())?;
    log_accounts("initial state", &accounts);

    let config = args.to_transfer_config();
    let outcome = match &args.db {
        Some(path) => {
            let service = TransferService::with_config(DuckDbStore::open(path)?, config);
            execute(service, &mut accounts, args.from, args.to, args.amount)?
        }
        None => {
            let store =
                InMemoryStore::with_accounts(accounts.iter().map(|a| (a.id, a.balance())));
            let service = TransferService::with_config(store, config);
            execute(service, &mut accounts, args.from, args.to, args.amount)?
        }
    };

    info!(%outcome, "transfer finished");
    log_accounts("final state", &accounts);

    write_accounts_csv(&accounts, output)?;
    Ok(outcome)
}

fn execute<S: Store>(
    mut service: TransferService<S>,
    accounts: &mut [Account],
    from: AccountId,
    to: AccountId,
    amount: Decimal,
) -> Result<TransferOutcome, TransferError> {
    let from_index = position(accounts, from)?;
    let to_index = position(accounts, to)?;

    if from_index == to_index {
        // Hand the service a second handle so it can refuse the self-transfer
        let mut alias = accounts[from_index].clone();
        return Ok(service.transfer(&mut accounts[from_index], &mut alias, amount));
    }

    let (from_account, to_account) = pair_mut(accounts, from_index, to_index);
    Ok(service.transfer(from_account, to_account, amount))
}

fn position(accounts: &[Account], id: AccountId) -> Result<usize, TransferError> {
    accounts
        .iter()
        .position(|account| account.id == id)
        .ok_or_else(|| TransferError::invalid_argument(format!("unknown account id {}", id)))
}

/// Two distinct mutable elements of `accounts`; `i != j`
fn pair_mut(accounts: &mut [Account], i: usize, j: usize) -> (&mut Account, &mut Account) {
    if i < j {
        let (left, right) = accounts.split_at_mut(j);
        (&mut left[i], &mut right[0])
    } else {
        let (left, right) = accounts.split_at_mut(i);
        (&mut right[0], &mut left[j])
    }
}

fn log_accounts(label: &str, accounts: &[Account]) {
    for account in accounts {
        info!(
            id = account.id,
            owner = %account.owner,
            balance = %account.balance(),
            "{}",
            label
        );
    }
}
