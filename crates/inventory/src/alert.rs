//! Expiration + low-stock alerting.
//!
//! An item is flagged when it expires within the policy window **and** its
//! count is below the low-stock threshold. The computation is a pure function
//! of the items, the reference time and the policy: nothing is mutated and the
//! same inputs always produce the same report.
//!
//! ## Date semantics
//!
//! Expiration dates are calendar dates. They are compared as wall-clock
//! midnight in the reference time's own timezone, against
//! `reference + expiry_window` (non-strict). Each stored date is parsed once,
//! before any comparison; a date that does not parse never counts as "early"
//! or "late", it is reported in [`AlertReport::rejected`] instead.

use chrono::{DateTime, Duration, NaiveDateTime, TimeZone};

use pantry_core::{InventoryError, InventoryResult, ItemId};

use crate::item::{ExpirationDate, Item};

pub const DEFAULT_EXPIRY_WINDOW_DAYS: i64 = 7;
pub const DEFAULT_LOW_STOCK_THRESHOLD: u32 = 10;

/// Alert thresholds.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AlertPolicy {
    expiry_window: Duration,
    low_stock_threshold: u32,
}

impl Default for AlertPolicy {
    fn default() -> Self {
        Self {
            expiry_window: Duration::days(DEFAULT_EXPIRY_WINDOW_DAYS),
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
        }
    }
}

impl AlertPolicy {
    /// Build a policy; the window must not be negative.
    pub fn new(expiry_window: Duration, low_stock_threshold: u32) -> InventoryResult<Self> {
        if expiry_window < Duration::zero() {
            return Err(InventoryError::validation("expiry window cannot be negative"));
        }
        Ok(Self {
            expiry_window,
            low_stock_threshold,
        })
    }

    pub fn expiry_window(&self) -> Duration {
        self.expiry_window
    }

    pub fn low_stock_threshold(&self) -> u32 {
        self.low_stock_threshold
    }

    /// Latest wall-clock instant an expiration may fall on to be flagged.
    pub fn horizon<Tz: TimeZone>(&self, reference: &DateTime<Tz>) -> NaiveDateTime {
        reference
            .naive_local()
            .checked_add_signed(self.expiry_window)
            .unwrap_or(NaiveDateTime::MAX)
    }

    fn flags(&self, expires_on: ExpirationDate, count: u32, horizon: NaiveDateTime) -> bool {
        expires_on.midnight() <= horizon && count < self.low_stock_threshold
    }
}

/// A flagged item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    item: Item,
    expires_on: ExpirationDate,
}

impl Alert {
    pub fn item(&self) -> &Item {
        &self.item
    }

    pub fn expires_on(&self) -> ExpirationDate {
        self.expires_on
    }

    /// User-facing alert line.
    pub fn message(&self) -> String {
        format!("{} is expiring soon or low in stock!", self.item.name())
    }
}

/// An item left out of the computation because its data is unusable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedItem {
    pub item_id: ItemId,
    pub error: InventoryError,
}

/// Outcome of [`compute_alerts`]: flagged items in input order, plus the
/// items whose expiration date could not be parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertReport {
    pub alerts: Vec<Alert>,
    pub rejected: Vec<RejectedItem>,
}

impl AlertReport {
    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    pub fn flagged_items(&self) -> impl Iterator<Item = &Item> {
        self.alerts.iter().map(Alert::item)
    }

    pub fn messages(&self) -> Vec<String> {
        self.alerts.iter().map(Alert::message).collect()
    }
}

/// Scan `items` and flag those expiring soon with low stock.
pub fn compute_alerts<Tz: TimeZone>(
    items: &[Item],
    reference: &DateTime<Tz>,
    policy: &AlertPolicy,
) -> AlertReport {
    let horizon = policy.horizon(reference);
    let mut report = AlertReport::default();

    for item in items {
        match item.expiration() {
            Ok(expires_on) => {
                if policy.flags(expires_on, item.count(), horizon) {
                    report.alerts.push(Alert {
                        item: item.clone(),
                        expires_on,
                    });
                }
            }
            Err(error) => report.rejected.push(RejectedItem {
                item_id: item.id_typed().clone(),
                error,
            }),
        }
    }

    report
}
