use super::aggregate::SheetReport;
use super::model::Side;
use crate::time::MonthRange;

/// Receives change notifications from a [`BudgetSheet`](super::BudgetSheet).
///
/// All methods default to no-ops so observers only implement what they use.
pub trait SheetObserver {
    /// A tree was edited; a recomputation is now pending.
    fn on_edited(&mut self, _side: Side) {}

    /// The month range changed and both trees were reconciled against it.
    fn on_range_changed(&mut self, _range: &MonthRange) {}

    /// Fresh aggregates are available.
    fn on_recomputed(&mut self, _report: &SheetReport) {}
}
