use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SheetError};
use crate::time::{Month, MonthRange};

/// Which half of the sheet a category tree belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    Income,
    Expense,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Income, Side::Expense];

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Income => "income",
            Side::Expense => "expense",
        }
    }

    /// Accepts `income`/`expense` and their common short forms, case-insensitively.
    pub fn from_label(raw: &str) -> Option<Side> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "income" | "in" | "i" => Some(Side::Income),
            "expense" | "expenses" | "out" | "e" => Some(Side::Expense),
            _ => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Numeric value of a line item for one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueSlot {
    pub time: Month,
    pub value: f64,
}

impl ValueSlot {
    pub fn new(time: Month, value: f64) -> Self {
        Self { time, value }
    }

    pub fn empty(time: Month) -> Self {
        Self::new(time, 0.0)
    }
}

/// A named line item holding one value per month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildCategory {
    pub label: String,
    pub values: Vec<ValueSlot>,
}

impl ChildCategory {
    /// Creates a line item with a zero slot for every month in `range`.
    pub fn new(label: impl Into<String>, range: &MonthRange) -> Self {
        Self {
            label: label.into(),
            values: range.iter().copied().map(ValueSlot::empty).collect(),
        }
    }

    pub fn with_values(label: impl Into<String>, values: Vec<ValueSlot>) -> Self {
        Self {
            label: label.into(),
            values,
        }
    }

    pub fn value_at(&self, month: Month) -> Option<f64> {
        self.values
            .iter()
            .find(|slot| slot.time == month)
            .map(|slot| slot.value)
    }

    pub fn months(&self) -> impl Iterator<Item = Month> + '_ {
        self.values.iter().map(|slot| slot.time)
    }

    pub fn is_chronological(&self) -> bool {
        self.values.windows(2).all(|pair| pair[0].time < pair[1].time)
    }

    /// Writes `value` into the slot for `month`, creating the slot in order if it is missing.
    pub fn set_value(&mut self, month: Month, value: f64) {
        if let Some(slot) = self.values.iter_mut().find(|slot| slot.time == month) {
            slot.value = value;
            return;
        }
        let position = self
            .values
            .iter()
            .position(|slot| slot.time > month)
            .unwrap_or(self.values.len());
        self.values.insert(position, ValueSlot::new(month, value));
    }
}

/// Top-level grouping of line items, such as "Salary" or "Housing".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentCategory {
    pub label: String,
    pub children: Vec<ChildCategory>,
}

impl ParentCategory {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            children: Vec::new(),
        }
    }
}

/// Editable hierarchy for one side of the sheet.
///
/// Parent labels are unique within a tree so that aggregates keyed by label
/// stay unambiguous.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryTree {
    side: Side,
    parents: Vec<ParentCategory>,
}

impl CategoryTree {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            parents: Vec::new(),
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn parents(&self) -> &[ParentCategory] {
        &self.parents
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    pub fn parent(&self, label: &str) -> Option<&ParentCategory> {
        self.parents.iter().find(|parent| parent.label == label)
    }

    pub fn parent_labels(&self) -> Vec<&str> {
        self.parents
            .iter()
            .map(|parent| parent.label.as_str())
            .collect()
    }

    pub fn add_parent(&mut self, label: impl Into<String>) -> Result<usize> {
        let label = label.into();
        self.ensure_unique(&label)?;
        self.parents.push(ParentCategory::new(label));
        Ok(self.parents.len() - 1)
    }

    /// Removes a parent together with all of its children.
    pub fn remove_parent(&mut self, label: &str) -> Result<ParentCategory> {
        let index = self.parent_index(label)?;
        Ok(self.parents.remove(index))
    }

    pub fn rename_parent(&mut self, label: &str, new_label: impl Into<String>) -> Result<()> {
        let new_label = new_label.into();
        let index = self.parent_index(label)?;
        if new_label != label {
            self.ensure_unique(&new_label)?;
        }
        self.parents[index].label = new_label;
        Ok(())
    }

    /// Appends a line item seeded with a zero slot per month of `range`.
    pub fn add_child(
        &mut self,
        parent: &str,
        label: impl Into<String>,
        range: &MonthRange,
    ) -> Result<usize> {
        let parent = self.parent_mut(parent)?;
        parent.children.push(ChildCategory::new(label, range));
        Ok(parent.children.len() - 1)
    }

    pub fn remove_child(&mut self, parent: &str, index: usize) -> Result<ChildCategory> {
        self.child_mut(parent, index)?;
        let parent = self.parent_mut(parent)?;
        Ok(parent.children.remove(index))
    }

    pub fn rename_child(
        &mut self,
        parent: &str,
        index: usize,
        label: impl Into<String>,
    ) -> Result<()> {
        self.child_mut(parent, index)?.label = label.into();
        Ok(())
    }

    pub fn child(&self, parent: &str, index: usize) -> Result<&ChildCategory> {
        let owner = self.parent(parent).ok_or_else(|| self.parent_missing(parent))?;
        owner
            .children
            .get(index)
            .ok_or_else(|| SheetError::ChildNotFound {
                parent: parent.to_string(),
                index,
            })
    }

    /// Swaps the child at `index` for `child`, returning the one it displaced.
    pub fn replace_child(
        &mut self,
        parent: &str,
        index: usize,
        child: ChildCategory,
    ) -> Result<ChildCategory> {
        let slot = self.child_mut(parent, index)?;
        Ok(std::mem::replace(slot, child))
    }

    pub fn set_value(&mut self, parent: &str, index: usize, month: Month, value: f64) -> Result<()> {
        self.child_mut(parent, index)?.set_value(month, value);
        Ok(())
    }

    pub(crate) fn children_mut(&mut self) -> impl Iterator<Item = &mut ChildCategory> + '_ {
        self.parents
            .iter_mut()
            .flat_map(|parent| parent.children.iter_mut())
    }

    fn child_mut(&mut self, parent: &str, index: usize) -> Result<&mut ChildCategory> {
        self.parent_mut(parent)?
            .children
            .get_mut(index)
            .ok_or_else(|| SheetError::ChildNotFound {
                parent: parent.to_string(),
                index,
            })
    }

    fn parent_mut(&mut self, label: &str) -> Result<&mut ParentCategory> {
        let index = self.parent_index(label)?;
        Ok(&mut self.parents[index])
    }

    fn parent_index(&self, label: &str) -> Result<usize> {
        self.parents
            .iter()
            .position(|parent| parent.label == label)
            .ok_or_else(|| self.parent_missing(label))
    }

    fn parent_missing(&self, label: &str) -> SheetError {
        SheetError::ParentNotFound {
            side: self.side,
            label: label.to_string(),
        }
    }

    fn ensure_unique(&self, label: &str) -> Result<()> {
        if self.parent(label).is_some() {
            return Err(SheetError::DuplicateParent {
                side: self.side,
                label: label.to_string(),
            });
        }
        Ok(())
    }
}

/// Coerces free-form cell input to a number; anything unparsable becomes `0`.
pub fn coerce_amount(raw: &str) -> f64 {
    finite_or_zero(raw.trim().parse::<f64>().unwrap_or(0.0))
}

/// Maps NaN and infinities to `0`.
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
