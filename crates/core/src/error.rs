//! Inventory error model.

use thiserror::Error;

/// Result type used across the pantry crates.
pub type InventoryResult<T> = Result<T, InventoryError>;

/// Inventory-level error.
///
/// Registry errors abort the action that raised them and leave prior state
/// unchanged. `InvalidDate` is a per-item data error: batch computations report
/// it next to the item instead of failing. `StoreUnavailable` wraps every
/// failure of the external document store and is always retryable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InventoryError {
    /// A category with this name is already registered.
    #[error("category already exists: {0}")]
    DuplicateCategory(String),

    /// The named category is not registered.
    #[error("category not found: {0}")]
    CategoryNotFound(String),

    /// No item with this id exists in the addressed category.
    #[error("item not found: {0}")]
    ItemNotFound(String),

    /// An expiration date could not be parsed as a calendar date.
    #[error("invalid date {value:?}: {reason}")]
    InvalidDate { value: String, reason: String },

    /// The external document store failed (retry is safe).
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// Malformed input (blank names, bad counts, ...).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A category rename was interrupted and must be resumed or aborted first.
    #[error("rename of category {from:?} to {to:?} is pending")]
    RenamePending { from: String, to: String },
}

impl InventoryError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_date(value: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidDate {
            value: value.into(),
            reason: reason.to_string(),
        }
    }

    pub fn store_unavailable(msg: impl Into<String>) -> Self {
        Self::StoreUnavailable(msg.into())
    }

    /// Whether retrying the same action may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }
}
