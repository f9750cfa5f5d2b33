//! The budget sheet: editable income/expense hierarchies over a month range,
//! plus the aggregates derived from them.

pub mod aggregate;
pub mod clipboard;
pub mod debounce;
pub mod flatten;
pub mod model;
pub mod observer;
pub mod reconcile;

pub use aggregate::{
    Balance, Balances, MonthTotals, ProfitLoss, SheetReport, SideReport, SubTotal, SubTotals,
};
pub use clipboard::CopyBuffer;
pub use debounce::Debouncer;
pub use flatten::{flatten, FlatRecord};
pub use model::{coerce_amount, CategoryTree, ChildCategory, ParentCategory, Side, ValueSlot};
pub use observer::SheetObserver;
pub use reconcile::{reconcile_tree, ReconcileStats};

use crate::config::SheetConfig;
use crate::errors::Result;
use crate::time::{Clock, Month, MonthRange, SystemClock};

/// Owns both category trees, the active month range and the copy buffer.
///
/// Tree edits are debounced: they arm a timer and the aggregates are rebuilt
/// by [`tick`](Self::tick) once the quiet window has elapsed, or immediately
/// by [`flush`](Self::flush). Range changes reconcile and recompute at once.
pub struct BudgetSheet<C: Clock = SystemClock> {
    range: MonthRange,
    income: CategoryTree,
    expense: CategoryTree,
    clipboard: CopyBuffer,
    debouncer: Debouncer,
    clock: C,
    report: SheetReport,
    observers: Vec<Box<dyn SheetObserver>>,
}

impl BudgetSheet<SystemClock> {
    pub fn new(config: &SheetConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl Default for BudgetSheet<SystemClock> {
    fn default() -> Self {
        Self::new(&SheetConfig::default())
    }
}

impl<C: Clock> BudgetSheet<C> {
    pub fn with_clock(config: &SheetConfig, clock: C) -> Self {
        let range = MonthRange::between(config.default_start, config.default_end);
        let income = CategoryTree::new(Side::Income);
        let expense = CategoryTree::new(Side::Expense);
        let report = SheetReport::compute(&income, &expense, &range);
        Self {
            range,
            income,
            expense,
            clipboard: CopyBuffer::new(),
            debouncer: Debouncer::from_millis(config.debounce_ms),
            clock,
            report,
            observers: Vec::new(),
        }
    }

    pub fn range(&self) -> &MonthRange {
        &self.range
    }

    pub fn tree(&self, side: Side) -> &CategoryTree {
        match side {
            Side::Income => &self.income,
            Side::Expense => &self.expense,
        }
    }

    pub fn clipboard(&self) -> &CopyBuffer {
        &self.clipboard
    }

    /// Aggregates as of the last recomputation.
    pub fn report(&self) -> &SheetReport {
        &self.report
    }

    /// Whether an edit is waiting for its debounced recomputation.
    pub fn is_stale(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Computes aggregates from the current state without touching the cached report.
    pub fn compute_report(&self) -> SheetReport {
        SheetReport::compute(&self.income, &self.expense, &self.range)
    }

    pub fn subscribe(&mut self, observer: Box<dyn SheetObserver>) {
        self.observers.push(observer);
    }

    pub fn set_range(&mut self, start: Month, end: Month) -> ReconcileStats {
        self.apply_range(MonthRange::between(start, end))
    }

    /// Like [`set_range`](Self::set_range) but from `YYYY-MM` strings; bad input yields an empty range.
    pub fn set_range_str(&mut self, start: &str, end: &str) -> ReconcileStats {
        self.apply_range(MonthRange::parse(start, end))
    }

    pub fn add_parent(&mut self, side: Side, label: impl Into<String>) -> Result<usize> {
        let index = self.tree_mut(side).add_parent(label)?;
        self.edited(side);
        Ok(index)
    }

    pub fn remove_parent(&mut self, side: Side, label: &str) -> Result<ParentCategory> {
        let removed = self.tree_mut(side).remove_parent(label)?;
        self.edited(side);
        Ok(removed)
    }

    pub fn rename_parent(
        &mut self,
        side: Side,
        label: &str,
        new_label: impl Into<String>,
    ) -> Result<()> {
        self.tree_mut(side).rename_parent(label, new_label)?;
        self.edited(side);
        Ok(())
    }

    /// Appends a line item with a zero slot for every month in the current range.
    pub fn add_child(
        &mut self,
        side: Side,
        parent: &str,
        label: impl Into<String>,
    ) -> Result<usize> {
        let range = self.range.clone();
        let index = self.tree_mut(side).add_child(parent, label, &range)?;
        self.edited(side);
        Ok(index)
    }

    pub fn remove_child(&mut self, side: Side, parent: &str, index: usize) -> Result<ChildCategory> {
        let removed = self.tree_mut(side).remove_child(parent, index)?;
        self.edited(side);
        Ok(removed)
    }

    pub fn rename_child(
        &mut self,
        side: Side,
        parent: &str,
        index: usize,
        label: impl Into<String>,
    ) -> Result<()> {
        self.tree_mut(side).rename_child(parent, index, label)?;
        self.edited(side);
        Ok(())
    }

    pub fn set_value(
        &mut self,
        side: Side,
        parent: &str,
        index: usize,
        month: Month,
        value: f64,
    ) -> Result<()> {
        self.tree_mut(side).set_value(parent, index, month, value)?;
        self.edited(side);
        Ok(())
    }

    /// Stores raw cell text, coercing it to a number first. Returns the stored value.
    pub fn set_value_text(
        &mut self,
        side: Side,
        parent: &str,
        index: usize,
        month: Month,
        raw: &str,
    ) -> Result<f64> {
        let value = coerce_amount(raw);
        self.set_value(side, parent, index, month, value)?;
        Ok(value)
    }

    pub fn copy(&mut self, side: Side, parent: &str, index: usize) -> Result<()> {
        let tree = match side {
            Side::Income => &self.income,
            Side::Expense => &self.expense,
        };
        self.clipboard.copy(tree, parent, index)?;
        tracing::debug!(%side, parent, index, "copied line item");
        Ok(())
    }

    /// Pastes the buffered line item over the child at `index`; `Ok(false)` when the buffer is empty.
    pub fn paste(&mut self, side: Side, parent: &str, index: usize) -> Result<bool> {
        let tree = match side {
            Side::Income => &mut self.income,
            Side::Expense => &mut self.expense,
        };
        let pasted = self.clipboard.paste(tree, parent, index)?;
        if pasted {
            self.edited(side);
        }
        Ok(pasted)
    }

    /// Recomputes if the debounce window has elapsed since the last edit.
    pub fn tick(&mut self) -> bool {
        if self.debouncer.poll(self.clock.now()) {
            self.recompute();
            true
        } else {
            false
        }
    }

    /// Recomputes right away if an edit is pending.
    pub fn flush(&mut self) -> bool {
        if self.debouncer.cancel() {
            self.recompute();
            true
        } else {
            false
        }
    }

    fn apply_range(&mut self, range: MonthRange) -> ReconcileStats {
        let mut stats = reconcile_tree(&mut self.income, &range);
        stats += reconcile_tree(&mut self.expense, &range);
        tracing::info!(
            start = ?range.first(),
            end = ?range.last(),
            months = range.len(),
            added = stats.added,
            removed = stats.removed,
            "month range changed"
        );
        self.range = range;
        for observer in &mut self.observers {
            observer.on_range_changed(&self.range);
        }
        self.debouncer.cancel();
        self.recompute();
        stats
    }

    fn tree_mut(&mut self, side: Side) -> &mut CategoryTree {
        match side {
            Side::Income => &mut self.income,
            Side::Expense => &mut self.expense,
        }
    }

    fn edited(&mut self, side: Side) {
        self.debouncer.notify(self.clock.now());
        for observer in &mut self.observers {
            observer.on_edited(side);
        }
    }

    fn recompute(&mut self) {
        self.report = self.compute_report();
        for observer in &mut self.observers {
            observer.on_recomputed(&self.report);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::Arc;

    use chrono::Duration;

    use super::*;
    use crate::time::ManualClock;

    #[derive(Default)]
    struct Recorder {
        events: Rc<RefCell<Vec<String>>>,
    }

    impl SheetObserver for Recorder {
        fn on_edited(&mut self, side: Side) {
            self.events.borrow_mut().push(format!("edited {side}"));
        }

        fn on_range_changed(&mut self, range: &MonthRange) {
            self.events
                .borrow_mut()
                .push(format!("range {}", range.len()));
        }

        fn on_recomputed(&mut self, report: &SheetReport) {
            self.events
                .borrow_mut()
                .push(format!("recomputed {}", report.balances.final_closing()));
        }
    }

    fn month(raw: &str) -> Month {
        raw.parse().unwrap()
    }

    fn sheet() -> (BudgetSheet<Arc<ManualClock>>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        let sheet = BudgetSheet::with_clock(&SheetConfig::default(), Arc::clone(&clock));
        (sheet, clock)
    }

    #[test]
    fn default_range_spans_2024() {
        let (sheet, _) = sheet();
        assert_eq!(sheet.range().len(), 12);
        assert_eq!(sheet.range().first(), Some(month("2024-01")));
        assert_eq!(sheet.report().balances.len(), 12);
    }

    #[test]
    fn edits_are_debounced_until_window_passes() {
        let (mut sheet, clock) = sheet();
        sheet.add_parent(Side::Income, "Salary").unwrap();
        sheet.add_child(Side::Income, "Salary", "Base pay").unwrap();
        sheet
            .set_value(Side::Income, "Salary", 0, month("2024-01"), 100.0)
            .unwrap();

        assert!(sheet.is_stale());
        assert!(!sheet.tick());
        assert_eq!(sheet.report().balances.final_closing(), 0.0);

        clock.advance(Duration::milliseconds(150));
        sheet
            .set_value(Side::Income, "Salary", 0, month("2024-02"), 50.0)
            .unwrap();
        clock.advance(Duration::milliseconds(150));
        assert!(!sheet.tick(), "second edit restarts the window");

        clock.advance(Duration::milliseconds(60));
        assert!(sheet.tick());
        assert!(!sheet.is_stale());
        assert_eq!(sheet.report().balances.final_closing(), 150.0);
        assert!(!sheet.tick());
    }

    #[test]
    fn flush_recomputes_immediately() {
        let (mut sheet, _) = sheet();
        assert!(!sheet.flush());
        sheet.add_parent(Side::Expense, "Housing").unwrap();
        sheet.add_child(Side::Expense, "Housing", "Rent").unwrap();
        sheet
            .set_value_text(Side::Expense, "Housing", 0, month("2024-03"), "900")
            .unwrap();
        assert!(sheet.flush());
        assert_eq!(sheet.report().profit_loss.get(month("2024-03")), -900.0);
        assert_eq!(sheet.report(), &sheet.compute_report());
    }

    #[test]
    fn range_change_reconciles_and_recomputes_synchronously() {
        let (mut sheet, _) = sheet();
        sheet.add_parent(Side::Income, "Salary").unwrap();
        sheet.add_child(Side::Income, "Salary", "Base pay").unwrap();
        sheet
            .set_value(Side::Income, "Salary", 0, month("2024-06"), 10.0)
            .unwrap();

        let stats = sheet.set_range(month("2024-06"), month("2025-01"));
        assert_eq!(stats.removed, 5);
        assert_eq!(stats.added, 1);
        assert!(!sheet.is_stale());

        let child = sheet.tree(Side::Income).child("Salary", 0).unwrap();
        assert_eq!(child.values.len(), 8);
        assert_eq!(child.value_at(month("2024-06")), Some(10.0));
        assert_eq!(sheet.report().balances.final_closing(), 10.0);
    }

    #[test]
    fn bad_range_strings_empty_the_sheet() {
        let (mut sheet, _) = sheet();
        sheet.set_range_str("2024-13", "2024-12");
        assert!(sheet.range().is_empty());
        assert!(sheet.report().profit_loss.is_empty());
    }

    #[test]
    fn observers_hear_every_stage() {
        let (mut sheet, clock) = sheet();
        let recorder = Recorder::default();
        let events = Rc::clone(&recorder.events);
        sheet.subscribe(Box::new(recorder));

        sheet.add_parent(Side::Income, "Salary").unwrap();
        clock.advance(Duration::milliseconds(200));
        sheet.tick();
        sheet.set_range(month("2024-01"), month("2024-02"));

        assert_eq!(
            *events.borrow(),
            ["edited income", "recomputed 0", "range 2", "recomputed 0"]
        );
    }

    #[test]
    fn paste_marks_sheet_edited_only_when_buffer_full() {
        let (mut sheet, _) = sheet();
        sheet.add_parent(Side::Income, "Salary").unwrap();
        sheet.add_child(Side::Income, "Salary", "Base pay").unwrap();
        sheet.add_parent(Side::Expense, "Savings").unwrap();
        sheet.add_child(Side::Expense, "Savings", "Placeholder").unwrap();
        sheet.flush();

        assert!(!sheet.paste(Side::Expense, "Savings", 0).unwrap());
        assert!(!sheet.is_stale());

        sheet
            .set_value(Side::Income, "Salary", 0, month("2024-01"), 75.0)
            .unwrap();
        sheet.copy(Side::Income, "Salary", 0).unwrap();
        assert!(sheet.paste(Side::Expense, "Savings", 0).unwrap());
        assert!(sheet.is_stale());

        sheet.flush();
        assert_eq!(sheet.report().profit_loss.get(month("2024-01")), 0.0);
        let pasted = sheet.tree(Side::Expense).child("Savings", 0).unwrap();
        assert_eq!(pasted.label, "Base pay");
    }
}
