//! Strongly-typed identifiers used across the pantry crates.
//!
//! Store ids are opaque strings chosen by the document store; the crate never
//! interprets them beyond equality.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::InventoryError;

/// Identifier of a document inside a store collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

/// Identifier of an inventory item (unique within its category).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

macro_rules! impl_string_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Generate a fresh identifier.
            ///
            /// Uses UUIDv7 (time-ordered) rendered as text. Prefer passing IDs
            /// explicitly in tests for determinism.
            pub fn generate() -> Self {
                Self(Uuid::now_v7().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $t {
            type Err = InventoryError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(InventoryError::validation(concat!($name, " cannot be empty")));
                }
                Ok(Self(trimmed.to_string()))
            }
        }
    };
}

impl_string_newtype!(DocumentId, "DocumentId");
impl_string_newtype!(ItemId, "ItemId");

impl From<DocumentId> for ItemId {
    fn from(value: DocumentId) -> Self {
        Self(value.0)
    }
}

impl From<ItemId> for DocumentId {
    fn from(value: ItemId) -> Self {
        Self(value.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_distinct() {
        assert_ne!(ItemId::generate(), ItemId::generate());
    }

    #[test]
    fn parsing_rejects_blank_ids() {
        assert!(matches!(
            "   ".parse::<ItemId>(),
            Err(InventoryError::Validation(_))
        ));
        assert_eq!("abc".parse::<ItemId>().unwrap().as_str(), "abc");
    }

    #[test]
    fn document_and_item_ids_convert_losslessly() {
        let doc: DocumentId = "x1".parse().unwrap();
        let item = ItemId::from(doc.clone());
        assert_eq!(DocumentId::from(item), doc);
    }

    #[test]
    fn serializes_as_plain_string() {
        let id: ItemId = "milk-1".parse().unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"milk-1\"");
    }
}
