//! Text search + category filter over a loaded item list.

use crate::item::Item;

/// Current search state of the item list.
///
/// An empty `search_term` matches every name; an empty `category` disables the
/// category filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub search_term: String,
    pub category: String,
}

impl Query {
    pub fn new(search_term: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            search_term: search_term.into(),
            category: category.into(),
        }
    }

    pub fn matches(&self, item: &Item) -> bool {
        Matcher::new(self).matches(item)
    }

    /// Matching items in input order.
    pub fn apply(&self, items: &[Item]) -> Vec<Item> {
        let matcher = Matcher::new(self);
        items.iter().filter(|item| matcher.matches(item)).cloned().collect()
    }
}

/// Filter `items` by case-insensitive name substring and exact category tag.
pub fn filter(items: &[Item], search_term: &str, filter_category: &str) -> Vec<Item> {
    Query::new(search_term, filter_category).apply(items)
}

// Lowercases the search term once per query instead of once per item.
struct Matcher<'a> {
    needle: String,
    category: &'a str,
}

impl<'a> Matcher<'a> {
    fn new(query: &'a Query) -> Self {
        Self {
            needle: query.search_term.to_lowercase(),
            category: &query.category,
        }
    }

    fn matches(&self, item: &Item) -> bool {
        let name_ok = self.needle.is_empty() || item.name().to_lowercase().contains(&self.needle);
        let category_ok = self.category.is_empty()
            || item.category().is_some_and(|c| c.as_str() == self.category);
        name_ok && category_ok
    }
}
