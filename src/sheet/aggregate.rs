//! Derived figures for a sheet: subtotals per parent and month, monthly
//! totals per side, profit/loss and the running opening/closing balance.
//!
//! Every function here is pure over its inputs, so a report can be thrown
//! away and recomputed from the trees and the range at any time.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::flatten::{flatten, FlatRecord};
use super::model::{finite_or_zero, CategoryTree, Side};
use crate::time::{Month, MonthRange};

/// Sum of one parent's line items for one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubTotal {
    pub parent: String,
    pub month: Month,
    pub total: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubTotals(Vec<SubTotal>);

impl SubTotals {
    /// Subtotal for `parent` in `month`; `0` when no such pair exists.
    pub fn get(&self, parent: &str, month: Month) -> f64 {
        self.0
            .iter()
            .find(|entry| entry.parent == parent && entry.month == month)
            .map(|entry| entry.total)
            .unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SubTotal> + '_ {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Month-keyed figures such as per-side totals or profit/loss.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonthTotals(BTreeMap<Month, f64>);

/// Income minus expense, per month.
pub type ProfitLoss = MonthTotals;

impl MonthTotals {
    /// Value for `month`; `0` when the month is outside the range.
    pub fn get(&self, month: Month) -> f64 {
        self.0.get(&month).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Month, f64)> + '_ {
        self.0.iter().map(|(month, value)| (*month, *value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(Month, f64)> for MonthTotals {
    fn from_iter<I: IntoIterator<Item = (Month, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    pub opening: f64,
    pub closing: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Balances(BTreeMap<Month, Balance>);

impl Balances {
    /// Balance for `month`; zeroed when the month is outside the range.
    pub fn get(&self, month: Month) -> Balance {
        self.0.get(&month).copied().unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Month, Balance)> + '_ {
        self.0.iter().map(|(month, balance)| (*month, *balance))
    }

    /// Closing balance of the last month, or `0` for an empty range.
    pub fn final_closing(&self) -> f64 {
        self.0
            .values()
            .next_back()
            .map(|balance| balance.closing)
            .unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Sums matching records for every (month, parent) pair.
///
/// Runs in `months × parents × records`, which is fine at spreadsheet scale.
pub fn sub_totals(records: &[FlatRecord], parents: &[&str], range: &MonthRange) -> SubTotals {
    let mut totals = Vec::with_capacity(range.len() * parents.len());
    for month in range {
        for parent in parents {
            let total = records
                .iter()
                .filter(|record| record.parent == *parent && record.time == *month)
                .map(|record| finite_or_zero(record.value))
                .sum::<f64>();
            totals.push(SubTotal {
                parent: (*parent).to_string(),
                month: *month,
                total,
            });
        }
    }
    SubTotals(totals)
}

pub fn month_totals(sub_totals: &SubTotals, range: &MonthRange) -> MonthTotals {
    range
        .iter()
        .map(|month| {
            let total = sub_totals
                .iter()
                .filter(|entry| entry.month == *month)
                .map(|entry| entry.total)
                .sum::<f64>();
            (*month, total)
        })
        .collect()
}

pub fn profit_loss(income: &MonthTotals, expense: &MonthTotals, range: &MonthRange) -> ProfitLoss {
    range
        .iter()
        .map(|month| (*month, income.get(*month) - expense.get(*month)))
        .collect()
}

/// Left-to-right fold over `range`: each month opens with the previous month's close.
pub fn balances(profit_loss: &ProfitLoss, range: &MonthRange) -> Balances {
    let mut running = BTreeMap::new();
    let mut opening = 0.0;
    for month in range {
        let closing = opening + profit_loss.get(*month);
        running.insert(*month, Balance { opening, closing });
        opening = closing;
    }
    Balances(running)
}

/// Aggregates for one side of the sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SideReport {
    pub records: Vec<FlatRecord>,
    pub sub_totals: SubTotals,
    pub month_totals: MonthTotals,
}

impl SideReport {
    pub fn compute(tree: &CategoryTree, range: &MonthRange) -> Self {
        let records = flatten(tree);
        let sub_totals = sub_totals(&records, &tree.parent_labels(), range);
        let month_totals = month_totals(&sub_totals, range);
        Self {
            records,
            sub_totals,
            month_totals,
        }
    }
}

/// Everything the presentation layer renders beneath the editable rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SheetReport {
    pub range: MonthRange,
    pub income: SideReport,
    pub expense: SideReport,
    pub profit_loss: ProfitLoss,
    pub balances: Balances,
}

impl SheetReport {
    pub fn compute(income: &CategoryTree, expense: &CategoryTree, range: &MonthRange) -> Self {
        let income = SideReport::compute(income, range);
        let expense = SideReport::compute(expense, range);
        let profit_loss = profit_loss(&income.month_totals, &expense.month_totals, range);
        let balances = balances(&profit_loss, range);
        tracing::debug!(
            months = range.len(),
            income_records = income.records.len(),
            expense_records = expense.records.len(),
            "computed sheet report"
        );
        Self {
            range: range.clone(),
            income,
            expense,
            profit_loss,
            balances,
        }
    }

    pub fn side(&self, side: Side) -> &SideReport {
        match side {
            Side::Income => &self.income,
            Side::Expense => &self.expense,
        }
    }
}
