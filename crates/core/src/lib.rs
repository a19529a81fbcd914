//! `pantry-core` — foundation types shared by the pantry crates.
//!
//! This crate contains **no IO**: identifiers, the error taxonomy, and the
//! marker traits the domain model is built on.

pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use entity::Entity;
pub use error::{InventoryError, InventoryResult};
pub use id::{DocumentId, ItemId};
pub use value_object::ValueObject;
