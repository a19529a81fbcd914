//! Configuration loading and representation.
//!
//! Settings come from the process environment:
//!
//! | variable | default |
//! |---|---|
//! | `PANTRY_ALERT_WINDOW_DAYS` | `7` |
//! | `PANTRY_LOW_STOCK_THRESHOLD` | `10` |
//! | `PANTRY_DEFAULT_CATEGORIES` | `Diary,Frozen Foods,Drinks,Canned Food,supplements` |
//! | `PANTRY_CASCADE_CATEGORY_DELETE` | `false` |

use chrono::Duration;
use thiserror::Error;

use pantry_core::InventoryError;
use pantry_inventory::{
    AlertPolicy, CategoryName, DEFAULT_EXPIRY_WINDOW_DAYS, DEFAULT_LOW_STOCK_THRESHOLD,
};

use crate::catalog::OrphanPolicy;

pub const ENV_ALERT_WINDOW_DAYS: &str = "PANTRY_ALERT_WINDOW_DAYS";
pub const ENV_LOW_STOCK_THRESHOLD: &str = "PANTRY_LOW_STOCK_THRESHOLD";
pub const ENV_DEFAULT_CATEGORIES: &str = "PANTRY_DEFAULT_CATEGORIES";
pub const ENV_CASCADE_CATEGORY_DELETE: &str = "PANTRY_CASCADE_CATEGORY_DELETE";

const DEFAULT_CATEGORIES: [&str; 5] = ["Diary", "Frozen Foods", "Drinks", "Canned Food", "supplements"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(key: &'static str, value: &str, reason: impl ToString) -> Self {
        Self::Invalid {
            key,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<ConfigError> for InventoryError {
    fn from(value: ConfigError) -> Self {
        InventoryError::Validation(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryConfig {
    pub alert_policy: AlertPolicy,
    /// Categories provisioned on first start, in display order.
    pub default_categories: Vec<CategoryName>,
    pub orphan_policy: OrphanPolicy,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            alert_policy: AlertPolicy::default(),
            default_categories: DEFAULT_CATEGORIES
                .iter()
                .filter_map(|name| CategoryName::parse(name).ok())
                .collect(),
            orphan_policy: OrphanPolicy::default(),
        }
    }
}

impl InventoryConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary key lookup; unset keys
    /// keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        let days = match lookup(ENV_ALERT_WINDOW_DAYS) {
            Some(raw) => parse_number::<u32>(ENV_ALERT_WINDOW_DAYS, &raw)?.into(),
            None => DEFAULT_EXPIRY_WINDOW_DAYS,
        };
        let threshold = match lookup(ENV_LOW_STOCK_THRESHOLD) {
            Some(raw) => parse_number::<u32>(ENV_LOW_STOCK_THRESHOLD, &raw)?,
            None => DEFAULT_LOW_STOCK_THRESHOLD,
        };
        config.alert_policy = AlertPolicy::new(Duration::days(days), threshold)
            .map_err(|e| ConfigError::invalid(ENV_ALERT_WINDOW_DAYS, &days.to_string(), e))?;

        if let Some(raw) = lookup(ENV_DEFAULT_CATEGORIES) {
            config.default_categories = parse_categories(&raw)?;
        }
        if let Some(raw) = lookup(ENV_CASCADE_CATEGORY_DELETE) {
            config.orphan_policy = if parse_bool(ENV_CASCADE_CATEGORY_DELETE, &raw)? {
                OrphanPolicy::Cascade
            } else {
                OrphanPolicy::Keep
            };
        }

        Ok(config)
    }
}

fn parse_number<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: core::str::FromStr,
    T::Err: core::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::invalid(key, raw, e))
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::invalid(key, raw, "expected a boolean")),
    }
}

fn parse_categories(raw: &str) -> Result<Vec<CategoryName>, ConfigError> {
    let mut names: Vec<CategoryName> = Vec::new();
    for part in raw.split(',').filter(|p| !p.trim().is_empty()) {
        let name = CategoryName::parse(part)
            .map_err(|e| ConfigError::invalid(ENV_DEFAULT_CATEGORIES, raw, e))?;
        if names.contains(&name) {
            return Err(ConfigError::invalid(
                ENV_DEFAULT_CATEGORIES,
                raw,
                format!("duplicate category {name}"),
            ));
        }
        names.push(name);
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = InventoryConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, InventoryConfig::default());
        assert_eq!(config.alert_policy, AlertPolicy::default());
        assert_eq!(config.default_categories.len(), 5);
        assert_eq!(config.default_categories[4].as_str(), "supplements");
        assert_eq!(config.orphan_policy, OrphanPolicy::Keep);
    }

    #[test]
    fn overrides_are_parsed() {
        let config = InventoryConfig::from_lookup(lookup(&[
            (ENV_ALERT_WINDOW_DAYS, " 3 "),
            (ENV_LOW_STOCK_THRESHOLD, "2"),
            (ENV_DEFAULT_CATEGORIES, "Drinks, Snacks,,"),
            (ENV_CASCADE_CATEGORY_DELETE, "Yes"),
        ]))
        .unwrap();

        assert_eq!(config.alert_policy.expiry_window(), Duration::days(3));
        assert_eq!(config.alert_policy.low_stock_threshold(), 2);
        let names: Vec<&str> = config.default_categories.iter().map(CategoryName::as_str).collect();
        assert_eq!(names, ["Drinks", "Snacks"]);
        assert_eq!(config.orphan_policy, OrphanPolicy::Cascade);
    }

    #[test]
    fn invalid_values_name_the_key() {
        let err = InventoryConfig::from_lookup(lookup(&[(ENV_ALERT_WINDOW_DAYS, "-1")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: ENV_ALERT_WINDOW_DAYS, .. }));

        let err = InventoryConfig::from_lookup(lookup(&[(ENV_CASCADE_CATEGORY_DELETE, "maybe")]))
            .unwrap_err();
        assert!(err.to_string().contains(ENV_CASCADE_CATEGORY_DELETE));

        let err = InventoryConfig::from_lookup(lookup(&[(ENV_DEFAULT_CATEGORIES, "Drinks,Drinks")]))
            .unwrap_err();
        assert!(err.to_string().contains("duplicate category Drinks"));
    }

    #[test]
    fn config_errors_convert_to_validation() {
        let err: InventoryError = ConfigError::invalid(ENV_LOW_STOCK_THRESHOLD, "x", "bad").into();
        assert!(matches!(err, InventoryError::Validation(_)));
    }
}
