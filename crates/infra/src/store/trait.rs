use std::sync::Arc;

use serde_json::Value as JsonValue;
use thiserror::Error;

use pantry_core::{DocumentId, InventoryError};

/// A document as returned by a collection listing.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: DocumentId,
    pub body: JsonValue,
}

/// Document store abstraction.
///
/// Collection existence is implicit: documents can be listed from a collection
/// whose marker was never created (or was deleted). Markers only drive
/// [`list_collections`](DocumentStore::list_collections). No schema validation
/// is performed on document bodies.
pub trait DocumentStore: Send + Sync {
    /// Names of collections that currently have a marker.
    fn list_collections(&self) -> Result<Vec<String>, StoreError>;

    /// Create the (empty) marker for a collection. Idempotent.
    fn create_collection(&self, collection: &str) -> Result<(), StoreError>;

    /// Delete the marker for a collection; its documents are left in place.
    fn delete_collection(&self, collection: &str) -> Result<(), StoreError>;

    /// All documents of a collection in store order.
    fn list_documents(&self, collection: &str) -> Result<Vec<StoredDocument>, StoreError>;

    /// Create a document and return the id assigned by the store.
    fn create_document(&self, collection: &str, body: JsonValue) -> Result<DocumentId, StoreError>;

    /// Overwrite the body of an existing document.
    fn update_document(
        &self,
        collection: &str,
        id: &DocumentId,
        body: JsonValue,
    ) -> Result<(), StoreError>;

    /// Delete an existing document.
    fn delete_document(&self, collection: &str, id: &DocumentId) -> Result<(), StoreError>;
}

impl<S> DocumentStore for Arc<S>
where
    S: DocumentStore + ?Sized,
{
    fn list_collections(&self) -> Result<Vec<String>, StoreError> {
        (**self).list_collections()
    }

    fn create_collection(&self, collection: &str) -> Result<(), StoreError> {
        (**self).create_collection(collection)
    }

    fn delete_collection(&self, collection: &str) -> Result<(), StoreError> {
        (**self).delete_collection(collection)
    }

    fn list_documents(&self, collection: &str) -> Result<Vec<StoredDocument>, StoreError> {
        (**self).list_documents(collection)
    }

    fn create_document(&self, collection: &str, body: JsonValue) -> Result<DocumentId, StoreError> {
        (**self).create_document(collection, body)
    }

    fn update_document(
        &self,
        collection: &str,
        id: &DocumentId,
        body: JsonValue,
    ) -> Result<(), StoreError> {
        (**self).update_document(collection, id, body)
    }

    fn delete_document(&self, collection: &str, id: &DocumentId) -> Result<(), StoreError> {
        (**self).delete_document(collection, id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The addressed document does not exist.
    #[error("document not found: {collection}/{id}")]
    DocumentNotFound { collection: String, id: DocumentId },

    /// The store could not be reached or refused the request.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for InventoryError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::DocumentNotFound { id, .. } => InventoryError::ItemNotFound(id.to_string()),
            StoreError::Unavailable(msg) => InventoryError::StoreUnavailable(msg),
        }
    }
}
