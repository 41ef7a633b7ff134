//! Account-related types for the bank transfer library
//!
//! This module defines the Account entity and the AccountPolicy that decides
//! whether a withdrawal may proceed.

use super::error::TransferError;
use rust_decimal::Decimal;

/// Account identifier (the `acc_id` key in the store)
pub type AccountId = u32;

/// Minimum balance a savings account must keep after any withdrawal
pub const SAVINGS_MIN_BALANCE: Decimal = Decimal::from_parts(500, 0, 0, false, 0);

/// Withdrawal rule attached to an account
///
/// A pure predicate over (current balance, amount). Evaluated before any
/// mutation and free of side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountPolicy {
    /// Withdrawal allowed only while the balance stays at or above `floor`
    MinimumBalance {
        /// Lowest balance the account may be left with (inclusive)
        floor: Decimal,
    },
}

impl AccountPolicy {
    /// Savings policy with the default 500 unit floor
    pub fn savings() -> Self {
        AccountPolicy::MinimumBalance {
            floor: SAVINGS_MIN_BALANCE,
        }
    }

    /// Returns true iff withdrawing `amount` from `current_balance` is allowed
    ///
    /// A zero amount is always allowed, even on an account already below its floor.
    pub fn authorize(&self, current_balance: Decimal, amount: Decimal) -> bool {
        if amount.is_zero() {
            return true;
        }

        match self {
            AccountPolicy::MinimumBalance { floor } => current_balance
                .checked_sub(amount)
                .is_some_and(|remaining| remaining >= *floor),
        }
    }

    /// Detail message used when `authorize` refuses a withdrawal
    pub fn describe_violation(&self, current_balance: Decimal, amount: Decimal) -> String {
        match self {
            AccountPolicy::MinimumBalance { floor } => format!(
                "Low balance: minimum {} required (balance {}, requested {})",
                floor, current_balance, amount
            ),
        }
    }
}

impl Default for AccountPolicy {
    fn default() -> Self {
        Self::savings()
    }
}

/// Balance-holding account
///
/// Mutated only through [`Account::deposit`] and [`Account::withdraw`]. The
/// balance is fixed-point; float arithmetic never touches it.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// Unique account ID
    pub id: AccountId,

    /// Display name of the owner (not unique)
    pub owner: String,

    /// Current balance
    balance: Decimal,

    /// Rule governing withdrawals
    policy: AccountPolicy,
}

impl Account {
    /// Create an account with the given starting balance and policy
    pub fn new(
        id: AccountId,
        owner: impl Into<String>,
        balance: Decimal,
        policy: AccountPolicy,
    ) -> Self {
        Account {
            id,
            owner: owner.into(),
            balance,
            policy,
        }
    }

    /// Create a savings account (500 unit minimum balance)
    pub fn savings(id: AccountId, owner: impl Into<String>, balance: Decimal) -> Self {
        Self::new(id, owner, balance, AccountPolicy::savings())
    }

    /// Current balance
    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// Withdrawal policy of this account
    pub fn policy(&self) -> AccountPolicy {
        self.policy
    }

    /// Credit `amount` to the account
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `amount` is negative
    /// - `ArithmeticOverflow` if the new balance does not fit a Decimal
    pub fn deposit(&mut self, amount: Decimal) -> Result<(), TransferError> {
        if amount < Decimal::ZERO {
            return Err(TransferError::invalid_argument(format!(
                "deposit amount must not be negative, got {}",
                amount
            )));
        }

        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or_else(|| TransferError::arithmetic_overflow("deposit", self.id))?;

        Ok(())
    }

    /// Debit `amount` from the account if the policy allows it
    ///
    /// On failure the balance is left untouched.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `amount` is negative
    /// - `PolicyViolation` if the policy refuses the withdrawal
    pub fn withdraw(&mut self, amount: Decimal) -> Result<(), TransferError> {
        if amount < Decimal::ZERO {
            return Err(TransferError::invalid_argument(format!(
                "withdrawal amount must not be negative, got {}",
                amount
            )));
        }

        if !self.policy.authorize(self.balance, amount) {
            return Err(TransferError::policy_violation(
                self.id,
                self.policy.describe_violation(self.balance, amount),
            ));
        }

        // authorize() already proved the subtraction does not underflow
        self.balance -= amount;

        Ok(())
    }

    /// Undo a successful `withdraw(amount)` without consulting the policy
    pub(crate) fn reverse_withdrawal(&mut self, amount: Decimal) {
        self.balance += amount;
    }

    /// Undo a successful `deposit(amount)` without consulting the policy
    pub(crate) fn reverse_deposit(&mut self, amount: Decimal) {
        self.balance -= amount;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case::well_above_floor(dec!(5000), dec!(1000), true)]
    #[case::exactly_to_floor(dec!(5000), dec!(4500), true)]
    #[case::one_cent_below_floor(dec!(5000), dec!(4500.01), false)]
    #[case::zero_amount(dec!(600), dec!(0), true)]
    #[case::below_floor(dec!(600), dec!(200), false)]
    #[case::below_floor_zero_amount(dec!(100), dec!(0), true)]
    fn test_minimum_balance_authorize(
        #[case] balance: Decimal,
        #[case] amount: Decimal,
        #[case] expected: bool,
    ) {
        assert_eq!(AccountPolicy::savings().authorize(balance, amount), expected);
    }

    #[test]
    fn test_custom_floor() {
        let policy = AccountPolicy::MinimumBalance { floor: dec!(0) };
        assert!(policy.authorize(dec!(10), dec!(10)));
        assert!(!policy.authorize(dec!(10), dec!(10.0001)));
    }

    #[test]
    fn test_deposit_increases_balance() {
        let mut account = Account::savings(1, "Akhil", dec!(1000));
        account.deposit(dec!(250.50)).unwrap();
        assert_eq!(account.balance(), dec!(1250.50));
    }

    #[test]
    fn test_deposit_negative_amount_fails() {
        let mut account = Account::savings(1, "Akhil", dec!(1000));
        let result = account.deposit(dec!(-1));
        assert!(matches!(result, Err(TransferError::InvalidArgument { .. })));
        assert_eq!(account.balance(), dec!(1000));
    }

    #[test]
    fn test_deposit_overflow_fails() {
        let mut account = Account::savings(1, "Akhil", Decimal::MAX);
        let result = account.deposit(dec!(1));
        assert!(matches!(
            result,
            Err(TransferError::ArithmeticOverflow { account: 1, .. })
        ));
        assert_eq!(account.balance(), Decimal::MAX);
    }

    #[test]
    fn test_withdraw_within_policy() {
        let mut account = Account::savings(1, "Akhil", dec!(5000));
        account.withdraw(dec!(1000)).unwrap();
        assert_eq!(account.balance(), dec!(4000));
    }

    #[test]
    fn test_withdraw_violating_policy_leaves_balance() {
        let mut account = Account::savings(2, "John", dec!(600));
        let result = account.withdraw(dec!(200));

        match result {
            Err(TransferError::PolicyViolation { account: id, detail }) => {
                assert_eq!(id, 2);
                assert!(detail.contains("minimum 500"));
            }
            other => panic!("Expected PolicyViolation, got {:?}", other),
        }
        assert_eq!(account.balance(), dec!(600));
    }

    #[test]
    fn test_withdraw_negative_amount_fails() {
        let mut account = Account::savings(1, "Akhil", dec!(5000));
        let result = account.withdraw(dec!(-5));
        assert!(matches!(result, Err(TransferError::InvalidArgument { .. })));
        assert_eq!(account.balance(), dec!(5000));
    }

    #[test]
    fn test_savings_floor_constant() {
        assert_eq!(SAVINGS_MIN_BALANCE, dec!(500));
    }
}
