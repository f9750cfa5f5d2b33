use serde::{Deserialize, Serialize};

use super::model::CategoryTree;
use crate::time::Month;

/// One value slot with its owning labels, ready for aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatRecord {
    pub label: String,
    pub parent: String,
    pub time: Month,
    pub value: f64,
}

/// Emits one record per value slot, parents and children in tree order.
pub fn flatten(tree: &CategoryTree) -> Vec<FlatRecord> {
    tree.parents()
        .iter()
        .flat_map(|parent| {
            parent.children.iter().flat_map(move |child| {
                child.values.iter().map(move |slot| FlatRecord {
                    label: child.label.clone(),
                    parent: parent.label.clone(),
                    time: slot.time,
                    value: slot.value,
                })
            })
        })
        .collect()
}
