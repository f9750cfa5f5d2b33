use std::sync::Arc;

use budget_sheet::config::SheetConfig;
use budget_sheet::sheet::{
    flatten, reconcile_tree, Balance, BudgetSheet, CategoryTree, SheetReport, Side,
};
use budget_sheet::time::{ManualClock, Month, MonthRange};
use chrono::Duration;

fn month(raw: &str) -> Month {
    raw.parse().expect("valid month")
}

fn config(start: &str, end: &str) -> SheetConfig {
    SheetConfig {
        default_start: month(start),
        default_end: month(end),
        ..SheetConfig::default()
    }
}

fn sample_sheet() -> BudgetSheet<Arc<ManualClock>> {
    let clock = Arc::new(ManualClock::default());
    let mut sheet = BudgetSheet::with_clock(&config("2024-01", "2024-06"), clock);
    sheet.add_parent(Side::Income, "Salary").unwrap();
    sheet.add_child(Side::Income, "Salary", "Base pay").unwrap();
    sheet.add_child(Side::Income, "Salary", "Bonus").unwrap();
    sheet.add_parent(Side::Expense, "Housing").unwrap();
    sheet.add_child(Side::Expense, "Housing", "Rent").unwrap();

    for (offset, current) in ["2024-01", "2024-02", "2024-03", "2024-04", "2024-05", "2024-06"]
        .into_iter()
        .enumerate()
    {
        let current = month(current);
        sheet
            .set_value(Side::Income, "Salary", 0, current, 100.0 + offset as f64)
            .unwrap();
        sheet
            .set_value(Side::Income, "Salary", 1, current, 50.0)
            .unwrap();
        sheet
            .set_value(Side::Expense, "Housing", 0, current, 80.0)
            .unwrap();
    }
    sheet.flush();
    sheet
}

#[test]
fn subtotal_adds_children_and_misses_are_zero() {
    let sheet = sample_sheet();
    let subs = &sheet.report().income.sub_totals;
    assert_eq!(subs.get("Salary", month("2024-01")), 150.0);
    assert_eq!(subs.get("Salary", month("2023-12")), 0.0);
    assert_eq!(subs.get("Housing", month("2024-01")), 0.0);
}

#[test]
fn balances_carry_forward_month_to_month() {
    let sheet = sample_sheet();
    let report = sheet.report();
    assert_eq!(report.profit_loss.get(month("2024-01")), 70.0);
    assert_eq!(
        report.balances.get(month("2024-01")),
        Balance {
            opening: 0.0,
            closing: 70.0
        }
    );
    assert_eq!(
        report.balances.get(month("2024-02")),
        Balance {
            opening: 70.0,
            closing: 141.0
        }
    );

    let mut previous_closing = 0.0;
    for (current, balance) in report.balances.iter() {
        assert_eq!(balance.opening, previous_closing, "{current}");
        previous_closing = balance.closing;
    }
}

#[test]
fn moving_the_window_keeps_surviving_values() {
    let mut sheet = sample_sheet();
    sheet.set_range_str("2024-03", "2024-08");

    for side in Side::ALL {
        for parent in sheet.tree(side).parents() {
            for child in &parent.children {
                let months: Vec<String> = child.months().map(|m| m.to_string()).collect();
                assert_eq!(
                    months,
                    ["2024-03", "2024-04", "2024-05", "2024-06", "2024-07", "2024-08"]
                );
            }
        }
    }
    let base = sheet.tree(Side::Income).child("Salary", 0).unwrap();
    assert_eq!(base.value_at(month("2024-03")), Some(102.0));
    assert_eq!(base.value_at(month("2024-06")), Some(105.0));
    assert_eq!(base.value_at(month("2024-07")), Some(0.0));
    assert_eq!(base.value_at(month("2024-01")), None);
}

#[test]
fn pasted_copy_is_equal_but_independent() {
    let mut sheet = sample_sheet();
    sheet.add_child(Side::Income, "Salary", "Spare").unwrap();
    sheet.copy(Side::Income, "Salary", 0).unwrap();
    assert!(sheet.paste(Side::Income, "Salary", 2).unwrap());

    let tree = sheet.tree(Side::Income);
    assert_eq!(tree.child("Salary", 0).unwrap(), tree.child("Salary", 2).unwrap());

    sheet
        .set_value(Side::Income, "Salary", 2, month("2024-01"), 1.0)
        .unwrap();
    let tree = sheet.tree(Side::Income);
    assert_eq!(
        tree.child("Salary", 0).unwrap().value_at(month("2024-01")),
        Some(100.0)
    );
    assert_eq!(
        sheet.clipboard().peek().unwrap().value_at(month("2024-01")),
        Some(100.0)
    );
}

#[test]
fn pasted_slots_wait_for_next_reconcile() {
    let mut sheet = sample_sheet();
    sheet.copy(Side::Income, "Salary", 0).unwrap();
    sheet.set_range_str("2024-04", "2024-07");
    sheet.paste(Side::Income, "Salary", 1).unwrap();

    let pasted = sheet.tree(Side::Income).child("Salary", 1).unwrap();
    assert_eq!(pasted.values.len(), 6, "snapshot slots are used verbatim");

    sheet.set_range_str("2024-04", "2024-07");
    let pasted = sheet.tree(Side::Income).child("Salary", 1).unwrap();
    assert_eq!(pasted.values.len(), 4);
    assert_eq!(pasted.value_at(month("2024-04")), Some(103.0));
    assert_eq!(pasted.value_at(month("2024-07")), Some(0.0));
}

#[test]
fn recomputing_is_idempotent() {
    let sheet = sample_sheet();
    let first = sheet.compute_report();
    let second = sheet.compute_report();
    assert_eq!(first, second);
    assert_eq!(&first, sheet.report());

    let income = sheet.tree(Side::Income).clone();
    let expense = sheet.tree(Side::Expense).clone();
    let standalone = SheetReport::compute(&income, &expense, sheet.range());
    assert_eq!(standalone, first);
}

#[test]
fn debounce_coalesces_rapid_edits() {
    let clock = Arc::new(ManualClock::default());
    let mut sheet = BudgetSheet::with_clock(&config("2024-01", "2024-01"), Arc::clone(&clock));
    sheet.add_parent(Side::Income, "Salary").unwrap();
    sheet.add_child(Side::Income, "Salary", "Base pay").unwrap();

    for amount in 1..=5 {
        sheet
            .set_value(Side::Income, "Salary", 0, month("2024-01"), f64::from(amount))
            .unwrap();
        clock.advance(Duration::milliseconds(100));
        assert!(!sheet.tick());
    }
    clock.advance(Duration::milliseconds(100));
    assert!(sheet.tick());
    assert_eq!(sheet.report().profit_loss.get(month("2024-01")), 5.0);
}

#[test]
fn reconcile_applies_to_each_tree_independently() {
    let range = MonthRange::parse("2024-01", "2024-02");
    let mut income = CategoryTree::new(Side::Income);
    income.add_parent("Salary").unwrap();
    income.add_child("Salary", "Base pay", &range).unwrap();
    let expense = CategoryTree::new(Side::Expense);

    let stats = reconcile_tree(&mut income, &MonthRange::parse("2024-02", "2024-03"));
    assert_eq!((stats.added, stats.removed), (1, 1));
    assert_eq!(flatten(&income).len(), 2);
    assert!(flatten(&expense).is_empty());
}
