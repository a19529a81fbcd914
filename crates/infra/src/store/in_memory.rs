use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

use serde_json::Value as JsonValue;

use pantry_core::DocumentId;

use super::r#trait::{DocumentStore, StoreError, StoredDocument};

const UNLIMITED: usize = usize::MAX;

#[derive(Debug, Default)]
struct Collection {
    marker: bool,
    documents: Vec<StoredDocument>,
}

/// In-memory document store.
///
/// Intended for tests/dev. Collections are listed in name order, documents in
/// insertion order. Supports fault injection: [`set_offline`](Self::set_offline)
/// fails every call, [`fail_after`](Self::fail_after) lets a number of writes
/// through and fails the rest.
#[derive(Debug)]
pub struct InMemoryDocumentStore {
    collections: RwLock<BTreeMap<String, Collection>>,
    offline: AtomicBool,
    write_budget: AtomicUsize,
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self {
            collections: RwLock::new(BTreeMap::new()),
            offline: AtomicBool::new(false),
            write_budget: AtomicUsize::new(UNLIMITED),
        }
    }
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every subsequent call until switched back.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Allow `writes` more mutating calls, then fail the rest.
    pub fn fail_after(&self, writes: usize) {
        self.write_budget.store(writes, Ordering::SeqCst);
    }

    /// Lift the write limit set by [`fail_after`](Self::fail_after).
    pub fn heal(&self) {
        self.write_budget.store(UNLIMITED, Ordering::SeqCst);
        self.set_offline(false);
    }

    /// Number of documents held in a collection, marker or not.
    pub fn document_count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .map(|c| c.get(collection).map_or(0, |c| c.documents.len()))
            .unwrap_or(0)
    }

    fn check_read(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("store is offline".to_string()));
        }
        Ok(())
    }

    fn check_write(&self) -> Result<(), StoreError> {
        self.check_read()?;
        self.write_budget
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |budget| match budget {
                UNLIMITED => Some(UNLIMITED),
                0 => None,
                n => Some(n - 1),
            })
            .map(|_| ())
            .map_err(|_| StoreError::Unavailable("write rejected by store".to_string()))
    }

    fn poisoned() -> StoreError {
        StoreError::Unavailable("lock poisoned".to_string())
    }

    fn not_found(collection: &str, id: &DocumentId) -> StoreError {
        StoreError::DocumentNotFound {
            collection: collection.to_string(),
            id: id.clone(),
        }
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn list_collections(&self) -> Result<Vec<String>, StoreError> {
        self.check_read()?;
        let collections = self.collections.read().map_err(|_| Self::poisoned())?;
        Ok(collections
            .iter()
            .filter(|(_, c)| c.marker)
            .map(|(name, _)| name.clone())
            .collect())
    }

    fn create_collection(&self, collection: &str) -> Result<(), StoreError> {
        self.check_write()?;
        let mut collections = self.collections.write().map_err(|_| Self::poisoned())?;
        collections.entry(collection.to_string()).or_default().marker = true;
        Ok(())
    }

    fn delete_collection(&self, collection: &str) -> Result<(), StoreError> {
        self.check_write()?;
        let mut collections = self.collections.write().map_err(|_| Self::poisoned())?;
        if let Some(c) = collections.get_mut(collection) {
            c.marker = false;
            if c.documents.is_empty() {
                collections.remove(collection);
            }
        }
        Ok(())
    }

    fn list_documents(&self, collection: &str) -> Result<Vec<StoredDocument>, StoreError> {
        self.check_read()?;
        let collections = self.collections.read().map_err(|_| Self::poisoned())?;
        Ok(collections
            .get(collection)
            .map(|c| c.documents.clone())
            .unwrap_or_default())
    }

    fn create_document(&self, collection: &str, body: JsonValue) -> Result<DocumentId, StoreError> {
        self.check_write()?;
        let mut collections = self.collections.write().map_err(|_| Self::poisoned())?;
        let id = DocumentId::generate();
        collections
            .entry(collection.to_string())
            .or_default()
            .documents
            .push(StoredDocument {
                id: id.clone(),
                body,
            });
        Ok(id)
    }

    fn update_document(
        &self,
        collection: &str,
        id: &DocumentId,
        body: JsonValue,
    ) -> Result<(), StoreError> {
        self.check_write()?;
        let mut collections = self.collections.write().map_err(|_| Self::poisoned())?;
        let doc = collections
            .get_mut(collection)
            .and_then(|c| c.documents.iter_mut().find(|d| &d.id == id))
            .ok_or_else(|| Self::not_found(collection, id))?;
        doc.body = body;
        Ok(())
    }

    fn delete_document(&self, collection: &str, id: &DocumentId) -> Result<(), StoreError> {
        self.check_write()?;
        let mut collections = self.collections.write().map_err(|_| Self::poisoned())?;
        let c = collections
            .get_mut(collection)
            .ok_or_else(|| Self::not_found(collection, id))?;
        let before = c.documents.len();
        c.documents.retain(|d| &d.id != id);
        if c.documents.len() == before {
            return Err(Self::not_found(collection, id));
        }
        if c.documents.is_empty() && !c.marker {
            collections.remove(collection);
        }
        Ok(())
    }
}
