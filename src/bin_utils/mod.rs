//! Drives a [`Bank`](crate::bank::Bank) from a CSV script of operations and prints
//! the resulting balances. Kept in the library so the integration tests can run it.

use std::io::{Read, Write};

use crate::{
    bank::Bank,
    processor::{OperationProcessor, ProcessError, in_memory_processor::InMemoryOperationProcessor},
};
use anyhow::{Context, Result};
use csv_parser::CsvOperationParser;
use csv_printer::{AccountRow, print_accounts};
pub mod csv_parser;
pub mod csv_printer;

pub struct Service<'w, R, W: 'w> {
    pub input: R,
    pub output: &'w mut W,
    pub bank_name: String,
    pub error_printer: Box<dyn FnMut(u64, ProcessError)>,
}

impl<'w, R, W> Service<'w, R, W>
where
    R: Read,
    W: Write + 'w,
{
    pub fn run(mut self) -> Result<()> {
        let parser = CsvOperationParser::new(self.input);

        let mut processor = InMemoryOperationProcessor::new(Bank::new(self.bank_name));

        for (line, row) in parser {
            let row = row.with_context(|| format!("Malformed operation at line {line}"))?;
            if let Err(err) = processor.process_operation(
                row.kind,
                &row.owner,
                row.counterparty.as_deref(),
                row.amount,
            ) {
                (self.error_printer)(line, err);
            }
        }

        print_accounts(
            self.output,
            processor.bank.accounts().iter().map(|acc| AccountRow {
                owner: acc.owner(),
                balance: acc.balance(),
            }),
        )
    }
}
