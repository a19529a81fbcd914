//! Category names and the registry of known categories.
//!
//! The registry is pure state: membership, the current selection and an
//! optional in-flight rename. Store effects (provisioning collections, copying
//! items) are driven from the infrastructure layer, which only commits a rename
//! here once the copy has been verified.

use serde::{Deserialize, Serialize};

use pantry_core::{InventoryError, InventoryResult, ValueObject};

/// Name of a category; also its identifier.
///
/// Surrounding whitespace is trimmed; comparison is exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CategoryName(String);

impl ValueObject for CategoryName {}

impl CategoryName {
    pub fn parse(value: impl AsRef<str>) -> InventoryResult<Self> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(InventoryError::validation("category name cannot be empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CategoryName {
    type Error = InventoryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<CategoryName> for String {
    fn from(value: CategoryName) -> Self {
        value.0
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for CategoryName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Progress of a pending rename.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum RenamePhase {
    /// Items are being copied; the source collection is untouched.
    #[default]
    Copying,
    /// The copy was verified; the source collection is being deleted.
    Copied,
}

/// A rename whose copy/verify/delete steps have not all completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRename {
    pub from: CategoryName,
    pub to: CategoryName,
    pub phase: RenamePhase,
}

impl PendingRename {
    fn to_error(&self) -> InventoryError {
        InventoryError::RenamePending {
            from: self.from.to_string(),
            to: self.to.to_string(),
        }
    }
}

/// Ordered set of category names plus the selected category.
///
/// Invariant: `selected`, when set, is a member of `categories`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryRegistry {
    categories: Vec<CategoryName>,
    selected: Option<CategoryName>,
    pending: Option<PendingRename>,
}

impl CategoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from existing names; nothing is selected.
    pub fn with_categories<I>(names: I) -> InventoryResult<Self>
    where
        I: IntoIterator<Item = CategoryName>,
    {
        let mut registry = Self::new();
        for name in names {
            registry.add(name)?;
        }
        Ok(registry)
    }

    /// Registered names in insertion order.
    pub fn list(&self) -> &[CategoryName] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn contains(&self, name: &CategoryName) -> bool {
        self.categories.contains(name)
    }

    pub fn selected(&self) -> Option<&CategoryName> {
        self.selected.as_ref()
    }

    pub fn pending_rename(&self) -> Option<&PendingRename> {
        self.pending.as_ref()
    }

    pub fn select(&mut self, name: &CategoryName) -> InventoryResult<()> {
        self.ensure_member(name)?;
        self.selected = Some(name.clone());
        Ok(())
    }

    /// Select the first category when nothing is selected yet.
    pub fn select_first_if_none(&mut self) {
        if self.selected.is_none() {
            self.selected = self.categories.first().cloned();
        }
    }

    pub fn add(&mut self, name: CategoryName) -> InventoryResult<()> {
        let reserved = self.pending.as_ref().is_some_and(|p| p.to == name);
        if reserved || self.contains(&name) {
            return Err(InventoryError::DuplicateCategory(name.to_string()));
        }
        self.categories.push(name);
        Ok(())
    }

    /// Remove a category. A removed selection falls back to the first
    /// remaining category, or to no selection when none remain.
    pub fn remove(&mut self, name: &CategoryName) -> InventoryResult<()> {
        if let Some(pending) = self.pending.as_ref().filter(|p| &p.from == name) {
            return Err(pending.to_error());
        }
        self.ensure_member(name)?;

        self.categories.retain(|c| c != name);
        if self.selected.as_ref() == Some(name) {
            self.selected = self.categories.first().cloned();
        }
        Ok(())
    }

    /// Validate and record a rename. The registry keeps listing `from` until
    /// [`commit_rename`](Self::commit_rename).
    pub fn begin_rename(
        &mut self,
        from: &CategoryName,
        to: CategoryName,
    ) -> InventoryResult<PendingRename> {
        if let Some(pending) = &self.pending {
            return Err(pending.to_error());
        }
        self.ensure_member(from)?;
        if self.contains(&to) {
            return Err(InventoryError::DuplicateCategory(to.to_string()));
        }

        let pending = PendingRename {
            from: from.clone(),
            to,
            phase: RenamePhase::Copying,
        };
        self.pending = Some(pending.clone());
        Ok(pending)
    }

    /// Record that the copy of the pending rename has been verified. From here
    /// on the rename can only be resumed, not aborted.
    pub fn mark_rename_copied(&mut self) -> InventoryResult<()> {
        let pending = self
            .pending
            .as_mut()
            .ok_or_else(|| InventoryError::validation("no category rename is pending"))?;
        pending.phase = RenamePhase::Copied;
        Ok(())
    }

    /// Replace the old name with the new one in place; the selection follows.
    pub fn commit_rename(&mut self) -> InventoryResult<PendingRename> {
        let pending = self
            .pending
            .take()
            .ok_or_else(|| InventoryError::validation("no category rename is pending"))?;

        if let Some(slot) = self.categories.iter_mut().find(|c| **c == pending.from) {
            *slot = pending.to.clone();
        }
        if self.selected.as_ref() == Some(&pending.from) {
            self.selected = Some(pending.to.clone());
        }
        Ok(pending)
    }

    /// Forget the pending rename, keeping the old name. Fails once the copy
    /// was verified, since the old collection may already be partly deleted.
    pub fn abort_rename(&mut self) -> InventoryResult<Option<PendingRename>> {
        if let Some(pending) = self.pending.as_ref().filter(|p| p.phase == RenamePhase::Copied) {
            return Err(InventoryError::validation(format!(
                "rename of {} to {} is past verification and must be resumed",
                pending.from, pending.to
            )));
        }
        Ok(self.pending.take())
    }

    fn ensure_member(&self, name: &CategoryName) -> InventoryResult<()> {
        if self.contains(name) {
            Ok(())
        } else {
            Err(InventoryError::CategoryNotFound(name.to_string()))
        }
    }
}
