use rust_decimal::Decimal;

use crate::{
    account::Account,
    bank::Bank,
    command::{BankCommand, OperationKind},
};

use super::{OperationProcessor, ProcessError};

#[derive(Debug, Default)]
pub struct InMemoryOperationProcessor {
    pub bank: Bank,
}

impl InMemoryOperationProcessor {
    pub fn new(bank: Bank) -> Self {
        Self { bank }
    }
}

impl OperationProcessor for InMemoryOperationProcessor {
    fn process_operation(
        &mut self,
        kind: OperationKind,
        owner: &str,
        counterparty: Option<&str>,
        amount: Option<Decimal>,
    ) -> Result<(), ProcessError> {
        let cmd = BankCommand::parse_command(&self.bank, kind, owner, counterparty, amount)?;
        match cmd {
            BankCommand::Open { owner, balance } => {
                self.bank.add_account(Account::new(owner, balance));
            }
            BankCommand::Debit { account, amount } => {
                self.bank.account_mut(account)?.debit(amount)?;
            }
            BankCommand::Credit { account, amount } => {
                self.bank.account_mut(account)?.credit(amount)?;
            }
            BankCommand::Transfer {
                source,
                destination,
                amount,
            } => {
                self.bank.transfer_within(source, destination, amount)?;
            }
        };
        Ok(())
    }
}
