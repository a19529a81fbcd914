//! Item CRUD over a category's document collection.
//!
//! Nothing is cached: every `load` goes back to the store, and callers reload
//! after each mutation to observe the new state.

use pantry_core::{DocumentId, InventoryError, InventoryResult, ItemId};
use pantry_inventory::{CategoryName, Item, ItemDraft, ItemFields, RejectedItem};

use crate::store::{DocumentStore, StoreError, StoredDocument};

/// Result of reading a category: the decoded items plus the documents that
/// could not be read as items, in store order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemScan {
    pub items: Vec<Item>,
    pub malformed: Vec<RejectedItem>,
}

pub struct ItemStore<S> {
    store: S,
}

impl<S> ItemStore<S>
where
    S: DocumentStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Fetch the items of a category in store order, tagged with the category.
    ///
    /// No selection yields an empty list. Documents that do not decode as
    /// items are left out; [`scan`](Self::scan) reports them.
    pub fn load(&self, category: Option<&CategoryName>) -> InventoryResult<Vec<Item>> {
        Ok(self.scan(category)?.items)
    }

    /// Like [`load`](Self::load), but also returns the ids of undecodable
    /// documents so they can still be shown and deleted.
    pub fn scan(&self, category: Option<&CategoryName>) -> InventoryResult<ItemScan> {
        let Some(category) = category else {
            return Ok(ItemScan::default());
        };

        let mut scan = ItemScan::default();
        for doc in self.store.list_documents(category.as_str())? {
            match decode(category, doc) {
                Ok(item) => scan.items.push(item),
                Err(rejected) => scan.malformed.push(rejected),
            }
        }

        tracing::debug!(
            "Loaded {} item(s) from category {} ({} malformed)",
            scan.items.len(),
            category,
            scan.malformed.len()
        );
        Ok(scan)
    }

    /// Create (draft without id) or fully overwrite (draft with id) an item.
    pub fn save(&self, category: &CategoryName, draft: ItemDraft) -> InventoryResult<ItemId> {
        let (id, fields) = draft.into_parts();
        fields.validate()?;
        let body = encode(&fields)?;

        match id {
            None => {
                let id = ItemId::from(self.store.create_document(category.as_str(), body)?);
                tracing::info!("Created item {} ({}) in category {}", id, fields.name, category);
                Ok(id)
            }
            Some(id) => {
                let doc_id = DocumentId::from(id.clone());
                self.store.update_document(category.as_str(), &doc_id, body)?;
                tracing::info!("Updated item {} ({}) in category {}", id, fields.name, category);
                Ok(id)
            }
        }
    }

    /// Delete an item; an absent id counts as already removed.
    pub fn remove(&self, category: &CategoryName, id: &ItemId) -> InventoryResult<()> {
        let doc_id = DocumentId::from(id.clone());
        match self.store.delete_document(category.as_str(), &doc_id) {
            Ok(()) => {
                tracing::info!("Deleted item {} from category {}", id, category);
                Ok(())
            }
            Err(StoreError::DocumentNotFound { .. }) => {
                tracing::debug!("Item {} already absent from category {}", id, category);
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }
}

fn encode(fields: &ItemFields) -> InventoryResult<serde_json::Value> {
    serde_json::to_value(fields)
        .map_err(|e| InventoryError::validation(format!("item fields: {e}")))
}

fn decode(category: &CategoryName, doc: StoredDocument) -> Result<Item, RejectedItem> {
    match serde_json::from_value::<ItemFields>(doc.body) {
        Ok(fields) => Ok(Item::new(doc.id.into(), fields).with_category(category.clone())),
        Err(err) => {
            tracing::warn!(
                "Skipping malformed item document {}/{}: {}",
                category,
                doc.id,
                err
            );
            Err(RejectedItem {
                item_id: doc.id.into(),
                error: InventoryError::validation(format!("malformed item document: {err}")),
            })
        }
    }
}
