//! Document store boundary.
//!
//! The hosted database is an opaque collaborator: one collection per category
//! name, each holding item documents keyed by an opaque id, plus an empty
//! marker per category that makes the collection show up in listings. This
//! module defines that contract without any storage assumptions, and an
//! in-memory implementation for tests/dev.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryDocumentStore;
pub use r#trait::{DocumentStore, StoreError, StoredDocument};
