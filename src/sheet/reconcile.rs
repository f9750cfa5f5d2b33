use serde::Serialize;

use super::model::{CategoryTree, ChildCategory, ValueSlot};
use crate::time::MonthRange;

/// Counts of value slots touched by one reconcile pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileStats {
    pub added: usize,
    pub removed: usize,
}

impl ReconcileStats {
    pub fn is_noop(&self) -> bool {
        self.added == 0 && self.removed == 0
    }
}

impl std::ops::AddAssign for ReconcileStats {
    fn add_assign(&mut self, other: Self) {
        self.added += other.added;
        self.removed += other.removed;
    }
}

/// Brings every child of `tree` in line with `range`.
///
/// Slots for months that left the range are dropped, zero slots are created
/// for months that entered it, and surviving slots keep their values. Each
/// child's slots end up in chronological order.
pub fn reconcile_tree(tree: &mut CategoryTree, range: &MonthRange) -> ReconcileStats {
    let mut stats = ReconcileStats::default();
    for child in tree.children_mut() {
        stats += reconcile_child(child, range);
    }
    tracing::debug!(
        side = %tree.side(),
        added = stats.added,
        removed = stats.removed,
        "reconciled category tree"
    );
    stats
}

pub fn reconcile_child(child: &mut ChildCategory, range: &MonthRange) -> ReconcileStats {
    let before = child.values.len();
    child.values.retain(|slot| range.contains(&slot.time));
    let removed = before - child.values.len();

    // Pasted slots are taken verbatim and may arrive unordered.
    if !child.is_chronological() {
        child.values.sort_by_key(|slot| slot.time);
        child.values.dedup_by_key(|slot| slot.time);
    }

    let mut added = 0;
    for month in range {
        if let Err(position) = child.values.binary_search_by_key(month, |slot| slot.time) {
            child.values.insert(position, ValueSlot::empty(*month));
            added += 1;
        }
    }

    ReconcileStats { added, removed }
}
