use std::sync::atomic::{AtomicU32, Ordering};

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, trace};

use crate::account::{Account, AccountError, credited, debited};

static NEXT_BANK_ID: AtomicU32 = AtomicU32::new(1);

/// Identifies a [`Bank`] for the lifetime of the process.
///
/// Accounts keep this instead of a reference, so the bank stays the only owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BankId(u32);

impl BankId {
    fn next() -> Self {
        Self(NEXT_BANK_ID.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Error)]
pub enum BankError {
    #[error("No account at position {index}")]
    UnknownAccount { index: usize },
    #[error(transparent)]
    Account(#[from] AccountError),
}

#[derive(Debug)]
pub struct Bank {
    id: BankId,
    name: String,
    accounts: Vec<Account>,
}

impl Default for Bank {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl Bank {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: BankId::next(),
            name: name.into(),
            accounts: Vec::new(),
        }
    }

    pub fn id(&self) -> BankId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Accounts in the order they were added.
    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn accounts_mut(&mut self) -> &mut [Account] {
        &mut self.accounts
    }

    /// Replaces the whole collection. Back-references are left as they are.
    pub fn set_accounts(&mut self, accounts: Vec<Account>) {
        self.accounts = accounts;
    }

    /// Registers `account` with this bank. No duplicate check is made.
    pub fn add_account(&mut self, mut account: Account) {
        account.set_bank(Some(self.id));
        trace!(bank = %self.name, owner = account.owner(), "Account added");
        self.accounts.push(account);
    }

    /// First account held by `owner`, in insertion order.
    pub fn find_account(&self, owner: &str) -> Option<&Account> {
        self.accounts.iter().find(|acc| acc.owner() == owner)
    }

    pub fn position(&self, owner: &str) -> Option<usize> {
        self.accounts.iter().position(|acc| acc.owner() == owner)
    }

    pub fn account_mut(&mut self, index: usize) -> Result<&mut Account, BankError> {
        self.accounts
            .get_mut(index)
            .ok_or(BankError::UnknownAccount { index })
    }

    /// Whether `account` was registered by this bank.
    pub fn registered(&self, account: &Account) -> bool {
        account.bank() == Some(self.id)
    }

    /// Debits `source` then credits `destination`.
    ///
    /// When the debit fails the error is returned as is and `destination` is
    /// never touched. Both new balances are worked out before either account
    /// changes, so a credit the destination cannot hold leaves `source` as it was.
    pub fn transfer(
        &self,
        source: &mut Account,
        destination: &mut Account,
        amount: Decimal,
    ) -> Result<(), AccountError> {
        let source_balance = debited(source.balance(), amount)?;
        let destination_balance = credited(destination.balance(), amount)?;
        source.set_balance(source_balance);
        destination.set_balance(destination_balance);
        debug!(
            bank = %self.name,
            from = source.owner(),
            to = destination.owner(),
            %amount,
            "Transferred"
        );
        Ok(())
    }

    /// Same as [`Bank::transfer`], for two accounts held by this bank and
    /// given by position. A transfer to the same position is a debit followed
    /// by a credit on that one account.
    pub fn transfer_within(
        &mut self,
        source: usize,
        destination: usize,
        amount: Decimal,
    ) -> Result<(), BankError> {
        for index in [source, destination] {
            if index >= self.accounts.len() {
                return Err(BankError::UnknownAccount { index });
            }
        }
        if source == destination {
            let acc = &mut self.accounts[source];
            let balance = credited(debited(acc.balance(), amount)?, amount)?;
            acc.set_balance(balance);
            return Ok(());
        }
        let (src, dst) = if source < destination {
            let (head, tail) = self.accounts.split_at_mut(destination);
            (&mut head[source], &mut tail[0])
        } else {
            let (head, tail) = self.accounts.split_at_mut(source);
            (&mut tail[0], &mut head[destination])
        };
        let source_balance = debited(src.balance(), amount)?;
        let destination_balance = credited(dst.balance(), amount)?;
        src.set_balance(source_balance);
        dst.set_balance(destination_balance);
        debug!(
            bank = %self.name,
            from = src.owner(),
            to = dst.owner(),
            %amount,
            "Transferred"
        );
        Ok(())
    }
}
