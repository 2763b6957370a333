//! Recommendation sources and the ranked-list currency they exchange.
//!
//! # Components
//!
//! - [`association`]: rule-based recommender over mined item co-occurrence
//! - [`hybrid`]: weighted score fusion across multiple sources
//!
//! A ranked list is a `Vec<ScoredItem>` sorted descending by score with each
//! item appearing at most once; [`sort_by_score`] and [`dedup_by_item`] are
//! the shared primitives that enforce it.

pub mod association;
pub mod hybrid;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::catalog::ItemDetails;
use crate::ItemId;

pub use association::AssociationRecommender;
pub use hybrid::{fuse_scores, EnsembleWeights, HybridRecommender, RefreshFlags, FUSION_POOL_SIZE};

/// One scored candidate item. Higher scores are better; there is no upper
/// bound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredItem {
    /// Candidate item.
    pub item_id: ItemId,
    /// Recommendation strength.
    pub score: f64,
}

/// A scored candidate annotated with catalog metadata.
///
/// `details` is `None` for items missing from the catalog (left-join
/// semantics).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedItem {
    /// Candidate item.
    pub item_id: ItemId,
    /// Recommendation strength.
    pub score: f64,
    /// Catalog metadata, when the item is cataloged.
    pub details: Option<ItemDetails>,
}

/// Per-call recommendation options.
///
/// # Examples
///
/// ```
/// use recomendar::recommend::RecommendOptions;
///
/// let options = RecommendOptions::default()
///     .with_ignore_interacted(true)
///     .with_top_n(20);
/// assert!(options.ignore_interacted);
/// assert_eq!(options.top_n, 20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendOptions {
    /// Exclude items the user has already interacted with.
    pub ignore_interacted: bool,
    /// Maximum number of candidates returned.
    pub top_n: usize,
}

impl Default for RecommendOptions {
    fn default() -> Self {
        Self {
            ignore_interacted: false,
            top_n: 10,
        }
    }
}

impl RecommendOptions {
    /// Set whether already-interacted items are excluded.
    #[must_use]
    pub fn with_ignore_interacted(mut self, ignore_interacted: bool) -> Self {
        self.ignore_interacted = ignore_interacted;
        self
    }

    /// Set the maximum list length.
    #[must_use]
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }
}

/// Stable sort by score descending; ties keep their current order.
pub fn sort_by_score(items: &mut [ScoredItem]) {
    items.sort_by(|a, b| b.score.total_cmp(&a.score));
}

/// Remove repeated item ids, keeping the first occurrence.
///
/// On a list already sorted descending this keeps each item's highest score.
/// Idempotent.
#[must_use]
pub fn dedup_by_item(items: Vec<ScoredItem>) -> Vec<ScoredItem> {
    let mut seen: HashSet<ItemId> = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|item| seen.insert(item.item_id))
        .collect()
}
