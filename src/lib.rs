#![doc(test(attr(deny(warnings))))]

//! Budget Sheet derives subtotals, monthly totals, profit/loss and running
//! balances from an editable income/expense hierarchy laid out over a range
//! of months, and keeps that hierarchy in step when the range moves.

pub mod cli;
pub mod config;
pub mod errors;
pub mod sheet;
pub mod time;
pub mod utils;

pub use errors::{Result, SheetError};
pub use sheet::{BudgetSheet, SheetReport, Side};
pub use time::{Month, MonthRange};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Budget Sheet tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}
