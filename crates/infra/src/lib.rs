//! Infrastructure layer: document store boundary, item/category persistence,
//! configuration, and the presentation-facing session.

pub mod catalog;
pub mod clock;
pub mod config;
pub mod item_store;
pub mod session;
pub mod store;

pub use catalog::{CategoryCatalog, OrphanPolicy};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, InventoryConfig};
pub use item_store::{ItemScan, ItemStore};
pub use session::{InventorySession, InventoryView};
pub use store::{DocumentStore, InMemoryDocumentStore, StoreError, StoredDocument};
