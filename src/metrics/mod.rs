//! Ranking metrics for evaluating recommendation output.
//!
//! Top-k measures over a [`ScoredItem`] list against held-out relevant items.

use crate::recommend::ScoredItem;
use crate::ItemId;

/// Hit@K: whether the target item appears in the top-K recommendations.
///
/// # Examples
///
/// ```
/// use recomendar::metrics::hit_at_k;
/// use recomendar::recommend::ScoredItem;
///
/// let recs = vec![
///     ScoredItem { item_id: 5, score: 3.0 },
///     ScoredItem { item_id: 3, score: 2.0 },
///     ScoredItem { item_id: 1, score: 1.0 },
/// ];
/// assert_eq!(hit_at_k(&recs, 3, 1), 0.0);
/// assert_eq!(hit_at_k(&recs, 3, 2), 1.0);
/// ```
#[must_use]
pub fn hit_at_k(recommendations: &[ScoredItem], target: ItemId, k: usize) -> f64 {
    if recommendations
        .iter()
        .take(k)
        .any(|rec| rec.item_id == target)
    {
        1.0
    } else {
        0.0
    }
}

/// Reciprocal rank: 1/rank of the target item, 0 when absent.
#[must_use]
pub fn reciprocal_rank(recommendations: &[ScoredItem], target: ItemId) -> f64 {
    for (i, rec) in recommendations.iter().enumerate() {
        if rec.item_id == target {
            return 1.0 / (i + 1) as f64;
        }
    }
    0.0
}

/// Precision@K: fraction of the top-K recommendations that are relevant.
///
/// Returns 0 when `k` is 0 or the recommendation list is empty.
#[must_use]
pub fn precision_at_k(recommendations: &[ScoredItem], relevant: &[ItemId], k: usize) -> f64 {
    if k == 0 || recommendations.is_empty() {
        return 0.0;
    }
    let window = recommendations.len().min(k);
    let hits = recommendations
        .iter()
        .take(k)
        .filter(|rec| relevant.contains(&rec.item_id))
        .count();
    hits as f64 / window as f64
}

/// Recall@K: fraction of the relevant items found in the top-K.
///
/// Returns 0 when there are no relevant items.
#[must_use]
pub fn recall_at_k(recommendations: &[ScoredItem], relevant: &[ItemId], k: usize) -> f64 {
    if relevant.is_empty() {
        return 0.0;
    }
    let hits = recommendations
        .iter()
        .take(k)
        .filter(|rec| relevant.contains(&rec.item_id))
        .count();
    hits as f64 / relevant.len() as f64
}
