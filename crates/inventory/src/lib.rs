//! Inventory domain module.
//!
//! This crate contains the decision-making rules of the pantry tracker,
//! implemented purely as deterministic domain logic (no IO, no rendering, no
//! storage): the item model, the category registry, the query filter and the
//! expiration/low-stock alert.

pub mod alert;
pub mod category;
pub mod item;
pub mod query;

pub use alert::{
    Alert, AlertPolicy, AlertReport, RejectedItem, compute_alerts, DEFAULT_EXPIRY_WINDOW_DAYS,
    DEFAULT_LOW_STOCK_THRESHOLD,
};
pub use category::{CategoryName, CategoryRegistry, PendingRename, RenamePhase};
pub use item::{ExpirationDate, Item, ItemDraft, ItemFields};
pub use query::{Query, filter};
