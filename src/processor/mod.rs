use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    account::AccountError,
    bank::BankError,
    command::{CommandError, OperationKind},
};

pub mod in_memory_processor;

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error(transparent)]
    CommandErr(#[from] CommandError),
    #[error(transparent)]
    AccountErr(#[from] AccountError),
}

impl From<BankError> for ProcessError {
    fn from(err: BankError) -> Self {
        match err {
            BankError::Account(err) => Self::AccountErr(err),
            BankError::UnknownAccount { index } => {
                Self::CommandErr(CommandError::UnknownPosition { index })
            }
        }
    }
}

pub trait OperationProcessor {
    fn process_operation(
        &mut self,
        kind: OperationKind,
        owner: &str,
        counterparty: Option<&str>,
        amount: Option<Decimal>,
    ) -> Result<(), ProcessError>;
}
