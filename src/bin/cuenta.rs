use std::fs::File;

use anyhow::{Context, Result};
use cuenta::{account::AccountError, bin_utils::Service, processor::ProcessError};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const DEFAULT_BANK_NAME: &str = "Banco";

fn main() -> Result<()> {
    // stdout carries the CSV report, logs go to stderr
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let filename = args
        .next()
        .context("Expected a file name as the first argument")?;
    let bank_name = args.next().unwrap_or_else(|| DEFAULT_BANK_NAME.to_owned());
    let file = File::open(&filename).with_context(|| format!("Failed to open `{filename}`"))?;

    let service = Service {
        input: file,
        output: &mut std::io::stdout(),
        bank_name,
        error_printer: Box::new(|line, err| match err {
            // rejected debits are expected outcomes, not script mistakes
            ProcessError::AccountErr(err @ AccountError::InsufficientFunds) => {
                info!(line, "Operation rejected: {err}")
            }
            err => eprintln!("Error at line {line}: {err}"),
        }),
    };
    service.run()
}
