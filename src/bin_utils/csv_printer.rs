use std::io::Write;

use anyhow::Context;
use csv::Writer;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct AccountRow<'a> {
    pub owner: &'a str,
    pub balance: Decimal,
}

pub fn print_accounts<'a, W>(
    output: &mut W,
    accounts: impl Iterator<Item = AccountRow<'a>>,
) -> anyhow::Result<()>
where
    W: Write,
{
    let mut writer = Writer::from_writer(output);
    for acc in accounts {
        writer
            .serialize(&acc)
            .with_context(|| format!("Failed to write balance of `{}` to CSV", acc.owner))?;
    }
    writer.flush().context("Failed to flush CSV writer")?;
    Ok(())
}
