/// Account balance with exact decimal arithmetic and the insufficient funds guard.
pub mod account;

/// Bank holding an ordered list of accounts and moving funds between them.
pub mod bank;

/// Operations that can be scripted against a bank, validated before they
/// touch any account.
pub mod command;

/// Operation processor interface, plus "in memory" implementation backed by
/// a single [`bank::Bank`].
pub mod processor;

/// CSV input/output around the processor, shared by the binary and the
/// integration tests.
pub mod bin_utils;
