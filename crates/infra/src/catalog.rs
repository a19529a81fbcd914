//! Category management against the document store.
//!
//! `CategoryCatalog` pairs the pure [`CategoryRegistry`] with the store
//! effects each registry change needs. Registry state only changes after the
//! store accepted the change, so a failed action leaves the catalog as it was.
//!
//! ## Rename
//!
//! A rename moves every item document to the new collection:
//!
//! ```text
//! begin (registry validates, rename becomes pending)
//!   ↓
//! 1. provision marker for the new name
//!   ↓
//! 2. wipe any partial copy, copy every item document
//!   ↓
//! 3. verify copied count == source count      → phase: Copied
//!   ↓
//! 4. delete source documents and marker
//!   ↓
//! commit (registry swaps the name, selection follows)
//! ```
//!
//! A store failure at any step leaves the rename pending. Recovery:
//! [`resume_rename`](CategoryCatalog::resume_rename) re-runs the remaining
//! steps (steps 1-3 are skipped once the copy was verified), and
//! [`abort_rename`](CategoryCatalog::abort_rename) discards the partial copy
//! while the source is still untouched. Copied documents receive new ids.
//!
//! The target name must not hold documents when the rename begins. Under
//! [`OrphanPolicy::Keep`] a deleted category leaves its items behind, and a
//! rename onto that name is refused instead of wiping or merging them.

use pantry_core::{InventoryError, InventoryResult};
use pantry_inventory::{CategoryName, CategoryRegistry, PendingRename, RenamePhase};

use crate::store::{DocumentStore, StoreError};

/// What happens to a category's item documents when the category is deleted.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum OrphanPolicy {
    /// Delete only the category marker; item documents stay in the store.
    #[default]
    Keep,
    /// Delete every item document, then the marker.
    Cascade,
}

pub struct CategoryCatalog<S> {
    store: S,
    registry: CategoryRegistry,
    orphans: OrphanPolicy,
}

impl<S> CategoryCatalog<S>
where
    S: DocumentStore,
{
    /// Empty catalog; nothing is read from the store.
    pub fn new(store: S, orphans: OrphanPolicy) -> Self {
        Self {
            store,
            registry: CategoryRegistry::new(),
            orphans,
        }
    }

    /// Register the categories already in the store, provision the missing
    /// defaults, and select the first category.
    ///
    /// The defaults come first, in configured order, so the listing is stable
    /// across restarts. Other stored categories follow in the store's listing
    /// order (name order for the in-memory store).
    pub fn bootstrap(
        store: S,
        defaults: &[CategoryName],
        orphans: OrphanPolicy,
    ) -> InventoryResult<Self> {
        let mut existing: Vec<CategoryName> = store
            .list_collections()?
            .into_iter()
            .filter_map(|raw| match CategoryName::parse(&raw) {
                Ok(name) => Some(name),
                Err(err) => {
                    tracing::warn!("Ignoring store collection {:?}: {}", raw, err);
                    None
                }
            })
            .collect();

        let mut registry = CategoryRegistry::new();
        for name in defaults {
            match existing.iter().position(|n| n == name) {
                Some(pos) => {
                    existing.remove(pos);
                }
                None => {
                    store.create_collection(name.as_str())?;
                    tracing::info!("Provisioned default category {}", name);
                }
            }
            registry.add(name.clone())?;
        }
        for name in existing {
            registry.add(name)?;
        }
        registry.select_first_if_none();

        tracing::info!("Category catalog ready with {} categories", registry.len());
        Ok(Self {
            store,
            registry,
            orphans,
        })
    }

    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    pub fn list(&self) -> &[CategoryName] {
        self.registry.list()
    }

    pub fn selected(&self) -> Option<&CategoryName> {
        self.registry.selected()
    }

    pub fn select(&mut self, name: &CategoryName) -> InventoryResult<()> {
        self.registry.select(name)
    }

    /// Register a new category and provision its (empty) collection.
    pub fn add(&mut self, name: CategoryName) -> InventoryResult<()> {
        let mut next = self.registry.clone();
        next.add(name.clone())?;

        self.store.create_collection(name.as_str())?;
        self.registry = next;
        tracing::info!("Added category {}", name);
        Ok(())
    }

    /// Delete a category according to the orphan policy.
    pub fn remove(&mut self, name: &CategoryName) -> InventoryResult<()> {
        let mut next = self.registry.clone();
        next.remove(name)?;

        if self.orphans == OrphanPolicy::Cascade {
            let deleted = self.clear_documents(name)?;
            tracing::info!("Deleted {} item(s) of category {}", deleted, name);
        }
        self.store.delete_collection(name.as_str())?;
        self.registry = next;
        tracing::info!("Deleted category {}", name);
        Ok(())
    }

    /// Rename a category, moving all of its items.
    pub fn rename(&mut self, from: &CategoryName, to: CategoryName) -> InventoryResult<()> {
        let mut next = self.registry.clone();
        let pending = next.begin_rename(from, to)?;
        self.ensure_vacant(&pending.to)?;
        self.registry = next;
        tracing::info!("Renaming category {} to {}", pending.from, pending.to);
        self.drive_rename(pending)
    }

    /// Finish an interrupted rename.
    pub fn resume_rename(&mut self) -> InventoryResult<()> {
        let pending = self
            .registry
            .pending_rename()
            .cloned()
            .ok_or_else(|| InventoryError::validation("no category rename is pending"))?;
        tracing::info!(
            "Resuming rename of {} to {} ({:?})",
            pending.from,
            pending.to,
            pending.phase
        );
        self.drive_rename(pending)
    }

    /// Abandon an interrupted rename, discarding the partial copy.
    pub fn abort_rename(&mut self) -> InventoryResult<()> {
        let mut next = self.registry.clone();
        let Some(pending) = next.abort_rename()? else {
            return Ok(());
        };

        self.clear_documents(&pending.to)?;
        self.store.delete_collection(pending.to.as_str())?;
        self.registry = next;
        tracing::info!("Aborted rename of {} to {}", pending.from, pending.to);
        Ok(())
    }

    fn drive_rename(&mut self, pending: PendingRename) -> InventoryResult<()> {
        match self.run_rename_steps(&pending) {
            Ok(()) => {
                self.registry.commit_rename()?;
                tracing::info!("Renamed category {} to {}", pending.from, pending.to);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(
                    "Rename of {} to {} interrupted: {}",
                    pending.from,
                    pending.to,
                    err
                );
                Err(err)
            }
        }
    }

    fn run_rename_steps(&mut self, pending: &PendingRename) -> InventoryResult<()> {
        if pending.phase == RenamePhase::Copying {
            self.copy_verified(&pending.from, &pending.to)?;
            self.registry.mark_rename_copied()?;
        }

        self.clear_documents(&pending.from)?;
        self.store.delete_collection(pending.from.as_str())?;
        Ok(())
    }

    fn copy_verified(&self, from: &CategoryName, to: &CategoryName) -> InventoryResult<()> {
        self.store.create_collection(to.as_str())?;
        self.clear_documents(to)?;

        let source = self.store.list_documents(from.as_str())?;
        for doc in &source {
            self.store.create_document(to.as_str(), doc.body.clone())?;
        }

        let copied = self.store.list_documents(to.as_str())?.len();
        if copied != source.len() {
            return Err(InventoryError::store_unavailable(format!(
                "copy of {from} to {to} incomplete: expected {} document(s), found {copied}",
                source.len()
            )));
        }
        tracing::debug!("Copied {} item(s) from {} to {}", copied, from, to);
        Ok(())
    }

    // A rename target may only hold documents the rename itself copied.
    fn ensure_vacant(&self, name: &CategoryName) -> InventoryResult<()> {
        let orphans = self.store.list_documents(name.as_str())?.len();
        if orphans > 0 {
            tracing::warn!(
                "Refusing rename onto {}: {} item(s) of a deleted category remain",
                name,
                orphans
            );
            return Err(InventoryError::validation(format!(
                "category {name} still holds {orphans} item(s) of a deleted category"
            )));
        }
        Ok(())
    }

    // Deletes every document of a collection; already-gone documents are fine.
    fn clear_documents(&self, collection: &CategoryName) -> InventoryResult<usize> {
        let docs = self.store.list_documents(collection.as_str())?;
        let mut deleted = 0;
        for doc in docs {
            match self.store.delete_document(collection.as_str(), &doc.id) {
                Ok(()) => deleted += 1,
                Err(StoreError::DocumentNotFound { .. }) => {}
                Err(err) => return Err(err.into()),
            }
        }
        Ok(deleted)
    }
}
