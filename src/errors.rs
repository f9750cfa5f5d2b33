use std::result::Result as StdResult;

use thiserror::Error;

use crate::sheet::Side;

/// Error type for structural edits on a budget sheet and its configuration.
///
/// Numeric input, month ranges and aggregate lookups never fail; they degrade
/// to zero or empty results instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SheetError {
    #[error("Invalid month `{0}`, expected YYYY-MM")]
    InvalidMonth(String),
    #[error("Parent category `{label}` not found on {side} side")]
    ParentNotFound { side: Side, label: String },
    #[error("Parent category `{label}` already exists on {side} side")]
    DuplicateParent { side: Side, label: String },
    #[error("Parent category `{parent}` has no child at index {index}")]
    ChildNotFound { parent: String, index: usize },
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = StdResult<T, SheetError>;

impl From<std::io::Error> for SheetError {
    fn from(err: std::io::Error) -> Self {
        SheetError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for SheetError {
    fn from(err: serde_json::Error) -> Self {
        SheetError::Config(err.to_string())
    }
}
