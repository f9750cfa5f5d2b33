use super::model::{CategoryTree, ChildCategory};
use crate::errors::Result;

/// Single-slot buffer holding a detached copy of one line item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CopyBuffer {
    snapshot: Option<ChildCategory>,
}

impl CopyBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshots the child at `index` under `parent`, replacing any earlier copy.
    pub fn copy(&mut self, tree: &CategoryTree, parent: &str, index: usize) -> Result<()> {
        let child = tree.child(parent, index)?;
        self.snapshot = Some(child.clone());
        Ok(())
    }

    /// Replaces the child at `index` under `parent` with the buffered snapshot.
    ///
    /// Returns `Ok(false)` without touching the tree when nothing has been copied.
    /// Pasted slots are used as-is; they are brought in line with the month
    /// range on the next reconcile.
    pub fn paste(&self, tree: &mut CategoryTree, parent: &str, index: usize) -> Result<bool> {
        let Some(snapshot) = &self.snapshot else {
            return Ok(false);
        };
        tree.replace_child(parent, index, snapshot.clone())?;
        Ok(true)
    }

    pub fn peek(&self) -> Option<&ChildCategory> {
        self.snapshot.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.is_none()
    }

    pub fn clear(&mut self) {
        self.snapshot = None;
    }
}
