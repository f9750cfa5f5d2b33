//! Line-oriented shell that plays the presentation layer for a [`BudgetSheet`](crate::sheet::BudgetSheet).

pub mod commands;
pub mod context;
mod help;
pub mod output;
pub mod registry;
mod shell;
pub mod table;

pub use context::{CliError, CliMode, CommandError, ShellContext};
pub use shell::run_cli;
