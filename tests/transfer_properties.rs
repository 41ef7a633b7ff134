//! Transfer protocol properties checked against both store adapters
//!
//! Every test runs once on the in-memory store and once on an in-memory
//! DuckDB database, so the protocol is exercised against real SQL
//! transactions as well as the staged-write adapter.

use bank_transfer::core::{DuckDbStore, Fault, InMemoryStore, Store, TransferConfig};
use bank_transfer::{
    Account, AccountId, TransferError, TransferOutcome, TransferService, TransferState,
};
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[derive(Debug, Clone, Copy)]
enum Backend {
    Memory,
    DuckDb,
}

fn duckdb_store(rows: &[(AccountId, Decimal)]) -> DuckDbStore {
    let conn = duckdb::Connection::open_in_memory().expect("Failed to open DuckDB");
    conn.execute_batch(
        "CREATE TABLE accounts (acc_id INTEGER PRIMARY KEY, balance DECIMAL(18, 4) NOT NULL);",
    )
    .expect("Failed to create table");
    for &(id, balance) in rows {
        conn.execute(
            "INSERT INTO accounts VALUES (?, CAST(? AS DECIMAL(18, 4)))",
            duckdb::params![id, balance.to_string()],
        )
        .expect("Failed to seed account");
    }
    DuckDbStore::from_connection(conn)
}

/// Observations of one transfer: outcome plus balances before/after in memory and store
struct Observed {
    outcome: TransferOutcome,
    memory_before: (Decimal, Decimal),
    memory_after: (Decimal, Decimal),
    store_before: (Option<Decimal>, Option<Decimal>),
    store_after: (Option<Decimal>, Option<Decimal>),
}

fn observe<S: Store>(
    mut service: TransferService<S>,
    from: &mut Account,
    to: &mut Account,
    amount: Decimal,
) -> Observed {
    let store_before = (
        service.store_mut().balance(from.id).unwrap(),
        service.store_mut().balance(to.id).unwrap(),
    );
    let memory_before = (from.balance(), to.balance());

    let outcome = service.transfer(from, to, amount);

    Observed {
        outcome,
        memory_before,
        memory_after: (from.balance(), to.balance()),
        store_before,
        store_after: (
            service.store_mut().balance(from.id).unwrap(),
            service.store_mut().balance(to.id).unwrap(),
        ),
    }
}

/// Run one transfer between accounts 101 and 102 on the chosen backend
///
/// `stored` lists the rows the store knows about; the in-memory accounts
/// always start from `from_balance` / `to_balance`.
fn run(
    backend: Backend,
    stored: &[(AccountId, Decimal)],
    from_balance: Decimal,
    to_balance: Decimal,
    amount: Decimal,
) -> Observed {
    let mut from = Account::savings(101, "Akhil", from_balance);
    let mut to = Account::savings(102, "John", to_balance);
    let config = TransferConfig::without_deadline();

    match backend {
        Backend::Memory => {
            let store = InMemoryStore::with_accounts(stored.iter().copied());
            observe(
                TransferService::with_config(store, config),
                &mut from,
                &mut to,
                amount,
            )
        }
        Backend::DuckDb => observe(
            TransferService::with_config(duckdb_store(stored), config),
            &mut from,
            &mut to,
            amount,
        ),
    }
}

fn run_seeded(backend: Backend, from: Decimal, to: Decimal, amount: Decimal) -> Observed {
    run(backend, &[(101, from), (102, to)], from, to, amount)
}

#[rstest]
#[case::committed(dec!(5000), dec!(1000), dec!(1000))]
#[case::rejected(dec!(600), dec!(0), dec!(200))]
#[case::exact_floor(dec!(5000), dec!(1000), dec!(4500))]
#[case::past_floor(dec!(5000), dec!(1000), dec!(4500.01))]
#[case::zero_amount(dec!(700), dec!(300), dec!(0))]
#[case::fractional(dec!(1234.5678), dec!(0.0001), dec!(734.5678))]
fn conservation_holds(
    #[values(Backend::Memory, Backend::DuckDb)] backend: Backend,
    #[case] from: Decimal,
    #[case] to: Decimal,
    #[case] amount: Decimal,
) {
    let observed = run_seeded(backend, from, to, amount);

    let before = observed.memory_before.0 + observed.memory_before.1;
    let after = observed.memory_after.0 + observed.memory_after.1;
    assert_eq!(before, after, "money created or destroyed: {}", observed.outcome);
}

#[rstest]
fn committed_store_matches_memory(#[values(Backend::Memory, Backend::DuckDb)] backend: Backend) {
    let observed = run_seeded(backend, dec!(5000), dec!(1000), dec!(1000));

    assert_eq!(observed.outcome, TransferOutcome::Committed);
    assert_eq!(observed.memory_after, (dec!(4000), dec!(2000)));
    assert_eq!(
        observed.store_after,
        (Some(observed.memory_after.0), Some(observed.memory_after.1))
    );
}

#[rstest]
fn rejection_leaves_everything_untouched(
    #[values(Backend::Memory, Backend::DuckDb)] backend: Backend,
) {
    let observed = run_seeded(backend, dec!(600), dec!(0), dec!(200));

    assert!(matches!(
        observed.outcome,
        TransferOutcome::Rejected {
            reason: TransferError::PolicyViolation { .. }
        }
    ));
    assert_eq!(observed.memory_after, observed.memory_before);
    assert_eq!(observed.store_after, observed.store_before);
}

#[rstest]
fn unknown_destination_is_fully_reverted(
    #[values(Backend::Memory, Backend::DuckDb)] backend: Backend,
) {
    let observed = run(
        backend,
        &[(101, dec!(5000))],
        dec!(5000),
        dec!(1000),
        dec!(1000),
    );

    assert_eq!(observed.outcome.state(), TransferState::RolledBack);
    assert_eq!(observed.memory_after, (dec!(5000), dec!(1000)));
    assert_eq!(observed.store_after, (Some(dec!(5000)), None));
}

#[rstest]
fn unknown_source_is_fully_reverted(#[values(Backend::Memory, Backend::DuckDb)] backend: Backend) {
    let observed = run(
        backend,
        &[(102, dec!(1000))],
        dec!(5000),
        dec!(1000),
        dec!(1000),
    );

    assert_eq!(observed.outcome.state(), TransferState::RolledBack);
    assert_eq!(observed.memory_after, (dec!(5000), dec!(1000)));
    assert_eq!(observed.store_after, (None, Some(dec!(1000))));
}

#[rstest]
fn sub_precision_amount_never_diverges_from_store(
    #[values(Backend::Memory, Backend::DuckDb)] backend: Backend,
) {
    let observed = run_seeded(backend, dec!(5000), dec!(1000), dec!(0.00005));

    let stored_sum = |(from, to): (Option<Decimal>, Option<Decimal>)| {
        from.unwrap_or_default() + to.unwrap_or_default()
    };
    assert_eq!(
        stored_sum(observed.store_after),
        stored_sum(observed.store_before),
        "store total changed: {}",
        observed.outcome
    );

    match backend {
        // Exact store: the amount persists as is
        Backend::Memory => {
            assert_eq!(observed.outcome, TransferOutcome::Committed);
            assert_eq!(
                observed.store_after,
                (Some(observed.memory_after.0), Some(observed.memory_after.1))
            );
        }
        // DECIMAL(18, 4) would round it, so nothing may move
        Backend::DuckDb => {
            assert!(matches!(
                observed.outcome,
                TransferOutcome::Rejected {
                    reason: TransferError::InvalidArgument { .. }
                }
            ));
            assert_eq!(observed.memory_after, observed.memory_before);
            assert_eq!(observed.store_after, observed.store_before);
        }
    }
}

#[test]
fn duckdb_rejects_balance_finer_than_column() {
    let observed = run(
        Backend::DuckDb,
        &[(101, dec!(5000)), (102, dec!(1000))],
        dec!(5000.00001),
        dec!(1000),
        dec!(1),
    );

    assert!(matches!(
        observed.outcome,
        TransferOutcome::Rejected {
            reason: TransferError::InvalidArgument { .. }
        }
    ));
    assert_eq!(observed.memory_after, observed.memory_before);
    assert_eq!(observed.store_after, observed.store_before);
}

#[test]
fn duckdb_statement_failure_after_first_update_is_atomic() {
    // 100_000_000_000_999 does not fit DECIMAL(18, 4); the second update fails
    let huge = dec!(99999999999999);
    let observed = run_seeded(Backend::DuckDb, dec!(5000), huge, dec!(1000));

    assert!(matches!(
        observed.outcome,
        TransferOutcome::RolledBack {
            reason: TransferError::PersistenceFailure { .. }
        }
    ));
    assert_eq!(observed.memory_after, (dec!(5000), huge));
    assert_eq!(observed.store_after, (Some(dec!(5000)), Some(huge)));
}

#[rstest]
#[case::begin(Fault::Begin)]
#[case::first_update(Fault::Update { index: 0 })]
#[case::second_update(Fault::Update { index: 1 })]
#[case::commit(Fault::Commit)]
fn store_failures_restore_pre_call_state(#[case] fault: Fault) {
    let mut store = InMemoryStore::with_accounts([(101, dec!(5000)), (102, dec!(1000))]);
    store.inject(fault);
    let mut service = TransferService::with_config(store, TransferConfig::without_deadline());
    let mut from = Account::savings(101, "Akhil", dec!(5000));
    let mut to = Account::savings(102, "John", dec!(1000));

    let outcome = service.transfer(&mut from, &mut to, dec!(1000));

    assert!(matches!(
        outcome,
        TransferOutcome::RolledBack {
            reason: TransferError::PersistenceFailure { .. }
        }
    ));
    assert_eq!((from.balance(), to.balance()), (dec!(5000), dec!(1000)));
    assert_eq!(service.store().committed_balance(101), Some(dec!(5000)));
    assert_eq!(service.store().committed_balance(102), Some(dec!(1000)));
}

#[test]
fn rejected_transfer_can_be_retried_with_smaller_amount() {
    let store = InMemoryStore::with_accounts([(101, dec!(600)), (102, dec!(0))]);
    let mut service = TransferService::new(store);
    let mut from = Account::savings(101, "Akhil", dec!(600));
    let mut to = Account::savings(102, "John", dec!(0));

    let first = service.transfer(&mut from, &mut to, dec!(200));
    assert_eq!(first.state(), TransferState::Rejected);

    let second = service.transfer(&mut from, &mut to, dec!(100));
    assert_eq!(second, TransferOutcome::Committed);
    assert_eq!((from.balance(), to.balance()), (dec!(500), dec!(100)));
    assert_eq!(service.store().committed_balance(101), Some(dec!(500)));
    assert_eq!(service.store().committed_balance(102), Some(dec!(100)));
}

#[test]
fn store_recovers_after_fault_is_cleared() {
    let store = InMemoryStore::with_accounts([(101, dec!(5000)), (102, dec!(1000))]);
    let mut service = TransferService::new(store);
    let mut from = Account::savings(101, "Akhil", dec!(5000));
    let mut to = Account::savings(102, "John", dec!(1000));

    service.store_mut().inject(Fault::Commit);
    let failed = service.transfer(&mut from, &mut to, dec!(1000));
    assert_eq!(failed.state(), TransferState::RolledBack);

    service.store_mut().clear_faults();
    let retried = service.transfer(&mut from, &mut to, dec!(1000));
    assert_eq!(retried, TransferOutcome::Committed);
    assert_eq!((from.balance(), to.balance()), (dec!(4000), dec!(2000)));
}
