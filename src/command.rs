use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use crate::bank::Bank;

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Open,
    Debit,
    Credit,
    Transfer,
}

/// Operation resolved against a bank. Accounts are referred to by their
/// position in [`Bank::accounts`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BankCommand {
    Open {
        owner: String,
        balance: Decimal,
    },
    Debit {
        account: usize,
        amount: Decimal,
    },
    Credit {
        account: usize,
        amount: Decimal,
    },
    Transfer {
        source: usize,
        destination: usize,
        amount: Decimal,
    },
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Amount is required for {kind:?}")]
    AmountRequired { kind: OperationKind },
    #[error("Amount must not be negative for {kind:?}")]
    NegativeAmount { kind: OperationKind },
    #[error("There is no account owned by `{owner}`")]
    UnknownOwner { owner: String },
    #[error("Transfer requires a counterparty")]
    CounterpartyRequired,
    #[error("There is no account at position {index}")]
    UnknownPosition { index: usize },
}

impl BankCommand {
    pub fn parse_command(
        bank: &Bank,
        kind: OperationKind,
        owner: &str,
        counterparty: Option<&str>,
        amount: Option<Decimal>,
    ) -> Result<Self, CommandError> {
        let amount = amount.ok_or(CommandError::AmountRequired { kind })?;
        // opening balance is not bounded
        if kind != OperationKind::Open && amount < Decimal::ZERO {
            return Err(CommandError::NegativeAmount { kind });
        }
        match kind {
            OperationKind::Open => Ok(Self::Open {
                owner: owner.to_owned(),
                balance: amount,
            }),
            OperationKind::Debit => Ok(Self::Debit {
                account: Self::resolve_owner(bank, owner)?,
                amount,
            }),
            OperationKind::Credit => Ok(Self::Credit {
                account: Self::resolve_owner(bank, owner)?,
                amount,
            }),
            OperationKind::Transfer => {
                let source = Self::resolve_owner(bank, owner)?;
                let Some(counterparty) = counterparty.filter(|c| !c.is_empty()) else {
                    return Err(CommandError::CounterpartyRequired);
                };
                Ok(Self::Transfer {
                    source,
                    destination: Self::resolve_owner(bank, counterparty)?,
                    amount,
                })
            }
        }
    }

    fn resolve_owner(bank: &Bank, owner: &str) -> Result<usize, CommandError> {
        bank.position(owner).ok_or_else(|| CommandError::UnknownOwner {
            owner: owner.to_owned(),
        })
    }
}
