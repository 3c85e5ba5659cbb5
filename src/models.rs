use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A leaf category that directly lists products.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub detail_url: String,
}

/// Mapping value, stored on disk as `[name, detail_url]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryEntry(pub String, pub String);

impl CategoryEntry {
    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn detail_url(&self) -> &str {
        &self.1
    }
}

/// Keyed by category id, in discovery order.
pub type CategoryMap = IndexMap<String, CategoryEntry>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSample {
    pub name: String,
    /// Kept as displayed; may be a special price instead of the list price.
    pub price: String,
}
