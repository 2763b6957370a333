//! Item metadata lookup for detailed recommendation output.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ItemId;

/// Display metadata for one content item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDetails {
    /// Item title.
    pub title: String,
    /// Canonical URL.
    pub url: String,
    /// Content language code (e.g. `"en"`, `"pt"`).
    pub lang: String,
}

impl ItemDetails {
    /// Create metadata for one item.
    #[must_use]
    pub fn new(title: &str, url: &str, lang: &str) -> Self {
        Self {
            title: title.to_string(),
            url: url.to_string(),
            lang: lang.to_string(),
        }
    }
}

/// Lookup table from item id to display metadata.
///
/// Recommenders hold an optional catalog; detailed output without one fails
/// with [`MetadataRequired`](crate::RecomendarError::MetadataRequired).
///
/// # Examples
///
/// ```
/// use recomendar::catalog::{ItemCatalog, ItemDetails};
///
/// let catalog = ItemCatalog::new()
///     .with_item(10, ItemDetails::new("Intro to Mining", "https://ex.am/10", "en"));
/// assert!(catalog.get(10).is_some());
/// assert!(catalog.get(99).is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemCatalog {
    entries: BTreeMap<ItemId, ItemDetails>,
}

impl ItemCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace one item's metadata.
    #[must_use]
    pub fn with_item(mut self, item_id: ItemId, details: ItemDetails) -> Self {
        self.entries.insert(item_id, details);
        self
    }

    /// Insert one item's metadata.
    pub fn insert(&mut self, item_id: ItemId, details: ItemDetails) {
        self.entries.insert(item_id, details);
    }

    /// Metadata for an item, if cataloged.
    #[must_use]
    pub fn get(&self, item_id: ItemId) -> Option<&ItemDetails> {
        self.entries.get(&item_id)
    }

    /// Number of cataloged items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no items are cataloged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(ItemId, ItemDetails)> for ItemCatalog {
    fn from_iter<I: IntoIterator<Item = (ItemId, ItemDetails)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
