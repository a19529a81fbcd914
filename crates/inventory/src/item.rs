use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use pantry_core::{Entity, InventoryError, InventoryResult, ItemId, ValueObject};

use crate::category::CategoryName;

/// Persisted fields of an item (the body of an item document).
///
/// The expiration date stays textual here: the store performs no schema
/// validation, so a document may carry anything. It is parsed explicitly with
/// [`ExpirationDate::parse`] when a decision depends on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemFields {
    pub name: String,
    pub count: u32,
    pub expiration_date: String,
}

impl ItemFields {
    /// Reject fields that must never be written to the store.
    pub fn validate(&self) -> InventoryResult<()> {
        if self.name.trim().is_empty() {
            return Err(InventoryError::validation("item name cannot be empty"));
        }
        Ok(())
    }
}

/// A tracked inventory unit, as loaded from its category collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    id: ItemId,
    name: String,
    count: u32,
    expiration_date: String,
    category: Option<CategoryName>,
}

impl Item {
    pub fn new(id: ItemId, fields: ItemFields) -> Self {
        Self {
            id,
            name: fields.name,
            count: fields.count,
            expiration_date: fields.expiration_date,
            category: None,
        }
    }

    /// Tag the item with the category collection it was loaded from.
    pub fn with_category(mut self, category: CategoryName) -> Self {
        self.category = Some(category);
        self
    }

    pub fn id_typed(&self) -> &ItemId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// The expiration date exactly as stored.
    pub fn expiration_date(&self) -> &str {
        &self.expiration_date
    }

    pub fn category(&self) -> Option<&CategoryName> {
        self.category.as_ref()
    }

    /// Parse the stored expiration date.
    pub fn expiration(&self) -> InventoryResult<ExpirationDate> {
        ExpirationDate::parse(&self.expiration_date)
    }

    /// The persisted fields (category tag and id excluded).
    pub fn fields(&self) -> ItemFields {
        ItemFields {
            name: self.name.clone(),
            count: self.count,
            expiration_date: self.expiration_date.clone(),
        }
    }
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Editor state for the add/edit item dialog.
///
/// A draft without an id creates a new item when saved; a draft with an id
/// overwrites that item's name, count and expiration date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemDraft {
    pub id: Option<ItemId>,
    pub name: String,
    pub count: u32,
    pub expiration_date: String,
}

impl ItemDraft {
    /// Blank draft for the "Add Item" action.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Prefilled draft for the "Edit" action.
    pub fn from_item(item: &Item) -> Self {
        Self {
            id: Some(item.id.clone()),
            name: item.name.clone(),
            count: item.count,
            expiration_date: item.expiration_date.clone(),
        }
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    pub fn into_parts(self) -> (Option<ItemId>, ItemFields) {
        (
            self.id,
            ItemFields {
                name: self.name,
                count: self.count,
                expiration_date: self.expiration_date,
            },
        )
    }
}

/// A calendar date on which an item expires.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExpirationDate(NaiveDate);

impl ValueObject for ExpirationDate {}

impl ExpirationDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Parse `YYYY-MM-DD`, falling back to an RFC 3339 timestamp whose
    /// calendar date (in its own offset) is used.
    pub fn parse(value: &str) -> InventoryResult<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(InventoryError::invalid_date(value, "date is empty"));
        }

        match NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            Ok(date) => Ok(Self(date)),
            Err(date_err) => DateTime::parse_from_rfc3339(trimmed)
                .map(|dt| Self(dt.date_naive()))
                .map_err(|_| InventoryError::invalid_date(value, date_err)),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Wall-clock midnight at the start of the date.
    pub fn midnight(&self) -> NaiveDateTime {
        self.0.and_time(NaiveTime::MIN)
    }
}

impl core::fmt::Display for ExpirationDate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}
