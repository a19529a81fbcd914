//! Presentation-facing session: the callbacks a UI invokes.
//!
//! Each callback runs its store round trip(s), then reloads the selected
//! category and recomputes the alerts before returning a fresh
//! [`InventoryView`]. At most one mutation is in flight at a time (`&mut self`).
//! Errors are returned to the caller; a failed store call never panics and can
//! be retried.

use std::sync::Arc;

use pantry_core::{InventoryError, InventoryResult, ItemId};
use pantry_inventory::{
    AlertPolicy, AlertReport, CategoryName, Item, ItemDraft, PendingRename, Query, RejectedItem,
    compute_alerts,
};

use crate::catalog::CategoryCatalog;
use crate::clock::{Clock, SystemClock};
use crate::config::InventoryConfig;
use crate::item_store::ItemStore;
use crate::store::DocumentStore;

/// Everything the presentation layer renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryView {
    pub categories: Vec<CategoryName>,
    pub selected: Option<CategoryName>,
    pub query: Query,
    /// Loaded items after search/filter.
    pub items: Vec<Item>,
    /// Alerts over every loaded item, regardless of the query.
    pub alerts: AlertReport,
    /// Documents in the selected category that do not read as items. Their
    /// ids can be passed to `on_delete_item`.
    pub malformed: Vec<RejectedItem>,
    pub pending_rename: Option<PendingRename>,
}

pub struct InventorySession<S, C = SystemClock> {
    items: ItemStore<Arc<S>>,
    catalog: CategoryCatalog<Arc<S>>,
    clock: C,
    policy: AlertPolicy,
    query: Query,
    loaded: Vec<Item>,
    malformed: Vec<RejectedItem>,
    alerts: AlertReport,
}

impl<S, C> InventorySession<S, C>
where
    S: DocumentStore,
    C: Clock,
{
    /// Bootstrap the categories and load the first one.
    pub fn open(store: Arc<S>, config: &InventoryConfig, clock: C) -> InventoryResult<Self> {
        let catalog = CategoryCatalog::bootstrap(
            Arc::clone(&store),
            &config.default_categories,
            config.orphan_policy,
        )?;
        Self::with_catalog(store, catalog, config.alert_policy, clock)
    }

    /// Build a session around an existing catalog and load its selection.
    pub fn with_catalog(
        store: Arc<S>,
        catalog: CategoryCatalog<Arc<S>>,
        policy: AlertPolicy,
        clock: C,
    ) -> InventoryResult<Self> {
        let mut session = Self {
            items: ItemStore::new(store),
            catalog,
            clock,
            policy,
            query: Query::default(),
            loaded: Vec::new(),
            malformed: Vec::new(),
            alerts: AlertReport::default(),
        };
        session.reload()?;
        Ok(session)
    }

    /// Current view without touching the store.
    pub fn view(&self) -> InventoryView {
        InventoryView {
            categories: self.catalog.list().to_vec(),
            selected: self.catalog.selected().cloned(),
            query: self.query.clone(),
            items: self.query.apply(&self.loaded),
            alerts: self.alerts.clone(),
            malformed: self.malformed.clone(),
            pending_rename: self.catalog.registry().pending_rename().cloned(),
        }
    }

    /// Fetch the selected category again and recompute the alerts.
    pub fn reload(&mut self) -> InventoryResult<InventoryView> {
        let scan = self.items.scan(self.catalog.selected())?;
        self.loaded = scan.items;
        self.malformed = scan.malformed;
        self.alerts = compute_alerts(&self.loaded, &self.clock.now(), &self.policy);
        if !self.alerts.rejected.is_empty() {
            tracing::warn!(
                "{} item(s) with unparseable expiration dates left out of alerts",
                self.alerts.rejected.len()
            );
        }
        Ok(self.view())
    }

    /// Blank draft for a new item.
    pub fn on_add_item(&self) -> ItemDraft {
        ItemDraft::empty()
    }

    /// Draft prefilled from an existing item.
    pub fn on_edit_item(&self, item: &Item) -> ItemDraft {
        ItemDraft::from_item(item)
    }

    /// Persist a draft into the selected category.
    pub fn on_save_item(&mut self, draft: ItemDraft) -> InventoryResult<InventoryView> {
        let category = self.require_selection()?;
        self.items.save(&category, draft)?;
        self.reload()
    }

    pub fn on_delete_item(&mut self, id: &ItemId) -> InventoryResult<InventoryView> {
        let category = self.require_selection()?;
        self.items.remove(&category, id)?;
        self.reload()
    }

    pub fn on_select_category(&mut self, name: &str) -> InventoryResult<InventoryView> {
        let name = CategoryName::parse(name)?;
        self.catalog.select(&name)?;
        self.reload()
    }

    pub fn on_add_category(&mut self, name: &str) -> InventoryResult<InventoryView> {
        self.catalog.add(CategoryName::parse(name)?)?;
        self.reload()
    }

    pub fn on_rename_category(&mut self, old: &str, new: &str) -> InventoryResult<InventoryView> {
        let old = CategoryName::parse(old)?;
        let new = CategoryName::parse(new)?;
        self.catalog.rename(&old, new)?;
        self.reload()
    }

    /// Finish a rename interrupted by a store failure.
    pub fn on_resume_rename(&mut self) -> InventoryResult<InventoryView> {
        self.catalog.resume_rename()?;
        self.reload()
    }

    /// Give up on an interrupted rename, keeping the old category.
    pub fn on_abort_rename(&mut self) -> InventoryResult<InventoryView> {
        self.catalog.abort_rename()?;
        self.reload()
    }

    pub fn on_delete_category(&mut self, name: &str) -> InventoryResult<InventoryView> {
        self.catalog.remove(&CategoryName::parse(name)?)?;
        self.reload()
    }

    /// Update the search term; the store is not consulted.
    pub fn on_search(&mut self, term: &str) -> InventoryView {
        self.query.search_term = term.to_string();
        self.view()
    }

    /// Update the category filter (empty for all); the store is not consulted.
    pub fn on_filter_category(&mut self, category: &str) -> InventoryView {
        self.query.category = category.to_string();
        self.view()
    }

    fn require_selection(&self) -> InventoryResult<CategoryName> {
        self.catalog
            .selected()
            .cloned()
            .ok_or_else(|| InventoryError::validation("no category selected"))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, NaiveDate};

    use super::*;
    use crate::catalog::OrphanPolicy;
    use crate::clock::FixedClock;
    use crate::store::InMemoryDocumentStore;

    fn clock() -> FixedClock {
        FixedClock(DateTime::parse_from_rfc3339("2024-05-01T09:00:00+02:00").unwrap())
    }

    fn in_days(days: u64) -> String {
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        (today + chrono::Days::new(days)).format("%Y-%m-%d").to_string()
    }

    fn draft(name: &str, count: u32, expiration_date: String) -> ItemDraft {
        ItemDraft {
            id: None,
            name: name.to_string(),
            count,
            expiration_date,
        }
    }

    fn open(
        store: &Arc<InMemoryDocumentStore>,
        categories: &[&str],
    ) -> InventorySession<InMemoryDocumentStore, FixedClock> {
        let config = InventoryConfig {
            default_categories: categories.iter().map(|c| CategoryName::parse(c).unwrap()).collect(),
            ..InventoryConfig::default()
        };
        InventorySession::open(Arc::clone(store), &config, clock()).unwrap()
    }

    fn item_names(view: &InventoryView) -> Vec<&str> {
        view.items.iter().map(Item::name).collect()
    }

    #[test]
    fn open_selects_first_default_category() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let session = open(&store, &["Diary", "Drinks"]);

        let view = session.view();
        assert_eq!(view.selected.as_ref().map(CategoryName::as_str), Some("Diary"));
        assert!(view.items.is_empty());
        assert!(view.alerts.is_empty());
    }

    #[test]
    fn saving_reloads_and_recomputes_alerts() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let mut session = open(&store, &["Diary"]);

        session.on_save_item(draft("Milk", 5, in_days(3))).unwrap();
        session.on_save_item(draft("Juice", 20, in_days(3))).unwrap();
        let view = session.on_save_item(draft("Soda", 2, in_days(30))).unwrap();

        assert_eq!(item_names(&view), ["Milk", "Juice", "Soda"]);
        let flagged: Vec<&str> = view.alerts.flagged_items().map(Item::name).collect();
        assert_eq!(flagged, ["Milk"]);
    }

    #[test]
    fn editing_overwrites_and_delete_removes() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let mut session = open(&store, &["Diary"]);
        let view = session.on_save_item(draft("Milk", 5, in_days(3))).unwrap();

        let mut edit = session.on_edit_item(&view.items[0]);
        edit.count = 50;
        let view = session.on_save_item(edit).unwrap();
        assert_eq!(view.items[0].count(), 50);
        assert!(view.alerts.is_empty());

        let id = view.items[0].id_typed().clone();
        let view = session.on_delete_item(&id).unwrap();
        assert!(view.items.is_empty());
    }

    #[test]
    fn search_and_filter_do_not_touch_alerts() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let mut session = open(&store, &["Diary"]);
        session.on_save_item(draft("Milk", 5, in_days(1))).unwrap();
        session.on_save_item(draft("Cheese", 5, in_days(1))).unwrap();

        let view = session.on_search("che");
        assert_eq!(item_names(&view), ["Cheese"]);
        assert_eq!(view.alerts.alerts.len(), 2);

        let view = session.on_filter_category("Drinks");
        assert!(view.items.is_empty());

        session.on_search("");
        let view = session.on_filter_category("Diary");
        assert_eq!(item_names(&view), ["Milk", "Cheese"]);
    }

    #[test]
    fn selecting_switches_loaded_items() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let mut session = open(&store, &["Diary", "Drinks"]);
        session.on_save_item(draft("Milk", 5, in_days(1))).unwrap();

        let view = session.on_select_category("Drinks").unwrap();
        assert!(view.items.is_empty());

        let view = session.on_select_category("Diary").unwrap();
        assert_eq!(item_names(&view), ["Milk"]);

        assert_eq!(
            session.on_select_category("Snacks"),
            Err(InventoryError::CategoryNotFound("Snacks".into()))
        );
    }

    #[test]
    fn deleting_the_only_category_leaves_no_selection() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let mut session = open(&store, &["Drinks"]);
        session.on_save_item(draft("Juice", 1, in_days(1))).unwrap();

        let view = session.on_delete_category("Drinks").unwrap();

        assert!(view.categories.is_empty());
        assert_eq!(view.selected, None);
        assert!(view.items.is_empty());
        assert!(view.alerts.is_empty());
        assert!(matches!(
            session.on_save_item(draft("Tea", 1, in_days(1))),
            Err(InventoryError::Validation(_))
        ));
    }

    #[test]
    fn rename_keeps_items_visible() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let mut session = open(&store, &["Drinks"]);
        session.on_save_item(draft("Juice", 1, in_days(1))).unwrap();

        let view = session.on_rename_category("Drinks", "Beverages").unwrap();

        assert_eq!(view.selected.as_ref().map(CategoryName::as_str), Some("Beverages"));
        assert_eq!(item_names(&view), ["Juice"]);
        assert_eq!(
            view.items[0].category().map(CategoryName::as_str),
            Some("Beverages")
        );
    }

    #[test]
    fn interrupted_rename_is_visible_and_resumable() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let mut session = open(&store, &["Drinks"]);
        session.on_save_item(draft("Juice", 1, in_days(1))).unwrap();
        session.on_save_item(draft("Water", 1, in_days(1))).unwrap();
        store.fail_after(2);

        assert!(session.on_rename_category("Drinks", "Beverages").is_err());
        let view = session.view();
        assert!(view.pending_rename.is_some());
        assert_eq!(item_names(&view), ["Juice", "Water"]);

        store.heal();
        let view = session.on_resume_rename().unwrap();
        assert!(view.pending_rename.is_none());
        assert_eq!(item_names(&view), ["Juice", "Water"]);
    }

    #[test]
    fn abort_rename_restores_prior_state() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let mut session = open(&store, &["Drinks"]);
        session.on_save_item(draft("Juice", 1, in_days(1))).unwrap();
        store.fail_after(1);
        assert!(session.on_rename_category("Drinks", "Beverages").is_err());

        store.heal();
        let view = session.on_abort_rename().unwrap();

        assert_eq!(view.selected.as_ref().map(CategoryName::as_str), Some("Drinks"));
        assert_eq!(store.document_count("Beverages"), 0);
    }

    #[test]
    fn store_outage_is_reported_not_fatal() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let mut session = open(&store, &["Diary"]);
        store.set_offline(true);

        let err = session.on_save_item(draft("Milk", 1, in_days(1))).unwrap_err();
        assert!(err.is_retryable());

        store.set_offline(false);
        let view = session.on_save_item(draft("Milk", 1, in_days(1))).unwrap();
        assert_eq!(item_names(&view), ["Milk"]);
    }

    #[test]
    fn invalid_dates_are_reported_alongside_alerts() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let mut session = open(&store, &["Diary"]);
        session.on_save_item(draft("Milk", 1, in_days(1))).unwrap();
        let view = session.on_save_item(draft("Eggs", 1, "whenever".to_string())).unwrap();

        assert_eq!(view.alerts.alerts.len(), 1);
        assert_eq!(view.alerts.rejected.len(), 1);
        assert_eq!(item_names(&view), ["Milk", "Eggs"]);
    }

    #[test]
    fn malformed_documents_are_listed_and_deletable() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let mut session = open(&store, &["Diary"]);
        let bad = store
            .create_document("Diary", serde_json::json!({"name": "Milk", "count": "lots"}))
            .unwrap();

        let view = session.on_save_item(draft("Cheese", 1, in_days(1))).unwrap();
        assert_eq!(item_names(&view), ["Cheese"]);
        assert_eq!(view.malformed.len(), 1);
        assert_eq!(view.malformed[0].item_id.as_str(), bad.as_str());

        let view = session.on_delete_item(&view.malformed[0].item_id.clone()).unwrap();
        assert!(view.malformed.is_empty());
        assert_eq!(store.document_count("Diary"), 1);
    }

    #[test]
    fn empty_catalog_loads_nothing() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let catalog = CategoryCatalog::new(Arc::clone(&store), OrphanPolicy::Keep);
        let mut session =
            InventorySession::with_catalog(Arc::clone(&store), catalog, AlertPolicy::default(), clock())
                .unwrap();

        assert!(session.reload().unwrap().items.is_empty());
        let view = session.on_add_category("Snacks").unwrap();
        assert_eq!(view.categories.len(), 1);
        assert_eq!(view.selected, None);
        assert_eq!(session.on_add_item(), ItemDraft::empty());
    }
}
