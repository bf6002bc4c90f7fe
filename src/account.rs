use std::hash::{Hash, Hasher};

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

use crate::bank::BankId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccountError {
    #[error("Dinero insuficiente")]
    InsufficientFunds,
    #[error("Balance would fall outside the representable decimal range")]
    Overflow,
    #[error("Balance cannot be represented without rounding")]
    PrecisionLoss,
}

/// `balance - amount`, refusing negative, out of range or rounded results.
pub(crate) fn debited(balance: Decimal, amount: Decimal) -> Result<Decimal, AccountError> {
    let new_balance = balance.checked_sub(amount).ok_or(AccountError::Overflow)?;
    if new_balance < Decimal::ZERO {
        return Err(AccountError::InsufficientFunds);
    }
    exact(new_balance, balance.checked_sub(new_balance), amount)
}

/// `balance + amount`, refusing out of range or rounded results.
pub(crate) fn credited(balance: Decimal, amount: Decimal) -> Result<Decimal, AccountError> {
    let new_balance = balance.checked_add(amount).ok_or(AccountError::Overflow)?;
    exact(new_balance, new_balance.checked_sub(balance), amount)
}

// Decimal rounds silently past 28 significant digits; if the step between the
// old and new balance is not `amount`, some of it was rounded away.
fn exact(
    new_balance: Decimal,
    step: Option<Decimal>,
    amount: Decimal,
) -> Result<Decimal, AccountError> {
    if step == Some(amount) {
        Ok(new_balance)
    } else {
        Err(AccountError::PrecisionLoss)
    }
}

/// A single holder's balance.
///
/// Equality only looks at the owner and the numeric value of the balance,
/// so `100` and `100.00` compare equal and the bank back-reference is ignored.
#[derive(Debug, Clone)]
pub struct Account {
    owner: String,
    balance: Decimal,
    bank: Option<BankId>,
}

impl Account {
    pub fn new(owner: impl Into<String>, balance: Decimal) -> Self {
        Self {
            owner: owner.into(),
            balance,
            bank: None,
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn set_owner(&mut self, owner: impl Into<String>) {
        self.owner = owner.into();
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn set_balance(&mut self, balance: Decimal) {
        self.balance = balance;
    }

    /// Bank that registered this account, if any.
    pub fn bank(&self) -> Option<BankId> {
        self.bank
    }

    pub fn set_bank(&mut self, bank: Option<BankId>) {
        self.bank = bank;
    }

    /// Withdraws `amount`, returning the new balance.
    ///
    /// Fails with [`AccountError::InsufficientFunds`] when the result would be
    /// negative, in which case the balance is left untouched. Results that do
    /// not fit a [`Decimal`] exactly are refused the same way.
    pub fn debit(&mut self, amount: Decimal) -> Result<Decimal, AccountError> {
        let new_balance = debited(self.balance, amount).inspect_err(|err| {
            debug!(owner = %self.owner, balance = %self.balance, %amount, %err, "Debit rejected");
        })?;
        debug!(owner = %self.owner, %amount, balance = %new_balance, "Debited");
        self.balance = new_balance;
        Ok(new_balance)
    }

    /// Deposits `amount`, returning the new balance. The sign of the amount is
    /// not checked; only results a [`Decimal`] cannot hold exactly are refused.
    pub fn credit(&mut self, amount: Decimal) -> Result<Decimal, AccountError> {
        let new_balance = credited(self.balance, amount).inspect_err(|err| {
            debug!(owner = %self.owner, balance = %self.balance, %amount, %err, "Credit rejected");
        })?;
        debug!(owner = %self.owner, %amount, balance = %new_balance, "Credited");
        self.balance = new_balance;
        Ok(new_balance)
    }
}

impl PartialEq for Account {
    fn eq(&self, other: &Self) -> bool {
        self.owner == other.owner && self.balance == other.balance
    }
}

impl Eq for Account {}

impl Hash for Account {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.owner.hash(state);
        // Decimal hashes its normalized value, matching its scale-insensitive eq
        self.balance.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::str::FromStr;

    use rstest::rstest;

    use super::*;

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    fn alejandro() -> Account {
        Account::new("Alejandro", dec("1000.12"))
    }

    #[test]
    fn new_account_holds_owner_and_balance() {
        let acc = alejandro();
        assert_eq!(acc.owner(), "Alejandro");
        assert_eq!(acc.balance(), dec("1000.12"));
        assert!(acc.balance() > Decimal::ZERO);
        assert_eq!(acc.bank(), None);
    }

    #[test]
    fn negative_initial_balance_is_accepted() {
        let acc = Account::new("Alejandro", dec("-5"));
        assert_eq!(acc.balance(), dec("-5"));
    }

    #[test]
    fn accessors_replace_fields() {
        let mut acc = alejandro();
        acc.set_owner("Ernesto");
        acc.set_balance(dec("12.5"));
        assert_eq!(acc.owner(), "Ernesto");
        assert_eq!(acc.balance().to_string(), "12.5");
    }

    #[rstest]
    #[case("100", "900.12")]
    #[case("1000.12", "0.00")]
    #[case("0.12", "1000.00")]
    #[case("0", "1000.12")]
    fn debit_subtracts_exactly(#[case] amount: &str, #[case] expected: &str) {
        let mut acc = alejandro();
        let balance = acc.debit(dec(amount)).unwrap();
        assert_eq!(balance, acc.balance());
        assert_eq!(acc.balance().to_string(), expected);
    }

    #[rstest]
    #[case("100", "1100.12")]
    #[case("0.0001", "1000.1201")]
    #[case("8999.88", "10000.00")]
    fn credit_adds_exactly(#[case] amount: &str, #[case] expected: &str) {
        let mut acc = alejandro();
        let balance = acc.credit(dec(amount)).unwrap();
        assert_eq!(balance, acc.balance());
        assert_eq!(acc.balance().to_string(), expected);
    }

    #[test]
    fn debit_over_balance_fails_without_mutation() {
        let mut acc = alejandro();
        let err = acc.debit(dec("1001")).unwrap_err();
        assert_eq!(err, AccountError::InsufficientFunds);
        assert_eq!(err.to_string(), "Dinero insuficiente");
        assert_eq!(acc.balance().to_string(), "1000.12");

        let err = acc.debit(dec("1000.13")).unwrap_err();
        assert!(matches!(err, AccountError::InsufficientFunds));
        assert_eq!(acc.balance().to_string(), "1000.12");
    }

    #[test]
    fn repeated_decimal_operations_do_not_drift() {
        let mut acc = Account::new("Alejandro", Decimal::ZERO);
        for _ in 0..10 {
            acc.credit(dec("0.1")).unwrap();
        }
        assert_eq!(acc.balance(), Decimal::ONE);
        for _ in 0..10 {
            acc.debit(dec("0.1")).unwrap();
        }
        assert!(acc.balance().is_zero());
    }

    // amounts are not validated: a negative credit lowers the balance and
    // skips the insufficient funds check
    #[test]
    fn negative_amounts_are_not_guarded() {
        let mut acc = alejandro();
        assert_eq!(acc.credit(dec("-2000")).unwrap(), dec("-999.88"));

        let mut acc = alejandro();
        assert_eq!(acc.debit(dec("-100")).unwrap(), dec("1100.12"));
    }

    #[rstest]
    #[case(Decimal::MAX, "1")]
    #[case(Decimal::MAX, "0.5")]
    #[case(Decimal::MIN, "-1")]
    #[case(dec("1"), "79228162514264337593543950335")]
    fn credit_out_of_range_fails_without_mutation(
        #[case] balance: Decimal,
        #[case] amount: &str,
    ) {
        let mut acc = Account::new("Alejandro", balance);
        let err = acc.credit(dec(amount)).unwrap_err();
        assert!(matches!(
            err,
            AccountError::Overflow | AccountError::PrecisionLoss
        ));
        assert_eq!(acc.balance(), balance);
    }

    #[test]
    fn credit_up_to_max_is_exact() {
        let mut acc = Account::new("Alejandro", Decimal::MAX - Decimal::ONE);
        assert_eq!(acc.credit(Decimal::ONE).unwrap(), Decimal::MAX);
        let err = acc.credit(Decimal::ONE).unwrap_err();
        assert_eq!(err, AccountError::Overflow);
        assert_eq!(acc.balance(), Decimal::MAX);
    }

    #[test]
    fn debit_below_min_overflows() {
        let mut acc = Account::new("Alejandro", Decimal::MIN);
        let err = acc.debit(Decimal::ONE).unwrap_err();
        assert_eq!(err, AccountError::Overflow);
        assert_eq!(acc.balance(), Decimal::MIN);

        // a negative debit from MAX goes past the upper bound
        let mut acc = Account::new("Alejandro", Decimal::MAX);
        assert_eq!(acc.debit(dec("-1")).unwrap_err(), AccountError::Overflow);
        assert_eq!(acc.balance(), Decimal::MAX);
    }

    #[rstest]
    #[case("1000.12", "0.0000000000000000000000000001")]
    #[case("1000000", "0.0000000000000000000000001")]
    #[case("12345678901234567890", "0.123456789012")]
    fn rounded_credit_is_refused(#[case] balance: &str, #[case] amount: &str) {
        let mut acc = Account::new("Alejandro", dec(balance));
        let err = acc.credit(dec(amount)).unwrap_err();
        assert_eq!(err, AccountError::PrecisionLoss);
        assert_eq!(acc.balance(), dec(balance));
    }

    #[test]
    fn rounded_debit_is_refused() {
        let mut acc = alejandro();
        let err = acc.debit(dec("0.0000000000000000000000000001")).unwrap_err();
        assert_eq!(err, AccountError::PrecisionLoss);
        assert_eq!(acc.balance().to_string(), "1000.12");
    }

    #[test]
    fn smallest_step_within_precision_is_kept() {
        let mut acc = Account::new("Alejandro", dec("0.1"));
        let balance = acc.credit(dec("0.0000000000000000000000000001")).unwrap();
        assert_eq!(balance.to_string(), "0.1000000000000000000000000001");
        assert_eq!(acc.debit(dec("0.1")).unwrap(), dec("0.0000000000000000000000000001"));
    }

    #[test]
    fn debit_on_negative_balance_is_rejected() {
        let mut acc = Account::new("Alejandro", dec("-5"));
        let err = acc.debit(Decimal::ZERO).unwrap_err();
        assert!(matches!(err, AccountError::InsufficientFunds));
        assert_eq!(acc.balance(), dec("-5"));
    }

    #[test]
    fn accounts_compare_by_value() {
        let a1 = alejandro();
        let a2 = alejandro();
        assert_eq!(a1, a2);
        assert!(!std::ptr::eq(&a1, &a2));

        assert_eq!(
            Account::new("Alejandro", dec("100")),
            Account::new("Alejandro", dec("100.00"))
        );
        assert_ne!(a1, Account::new("Ernesto", dec("1000.12")));
        assert_ne!(a1, Account::new("Alejandro", dec("1000.13")));
    }

    #[test]
    fn bank_reference_is_ignored_by_equality_and_hash() {
        let bank = crate::bank::Bank::new("Banco del estado");
        let mut registered = alejandro();
        registered.set_bank(Some(bank.id()));
        assert_eq!(registered, alejandro());

        let set: HashSet<Account> = [
            registered,
            alejandro(),
            Account::new("Alejandro", dec("1000.1200")),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.len(), 1);
    }
}
