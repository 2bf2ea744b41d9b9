//! Subcommand implementations.

pub mod accounts;
pub mod session;
pub mod shell;
