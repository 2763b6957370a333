//! Hybrid recommender: weighted score fusion across sources.
//!
//! Merges ranked lists from a content-based source, a collaborative source,
//! and the association recommender into a single list by weighted sum. Each
//! source is fetched with a wide internal pool before the merged result is
//! truncated, since a low-weight source's best item may still outrank a
//! high-weight source's last pooled item after weighting.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::catalog::ItemCatalog;
use crate::error::{RecomendarError, Result};
use crate::interaction::Interaction;
use crate::recommend::association::AssociationRecommender;
use crate::recommend::{dedup_by_item, sort_by_score, DetailedItem, RecommendOptions, ScoredItem};
use crate::traits::Recommender;
use crate::{ItemId, UserId};

const MODEL_NAME: &str = "hybrid";

/// Per-source candidate pool fetched before fusion.
///
/// Wide enough that weighting can reorder across sources; capped as a
/// cost/quality tradeoff rather than an exhaustive merge.
pub const FUSION_POOL_SIZE: usize = 1000;

/// Per-source fusion weights, all defaulting to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnsembleWeights {
    /// Weight of the content-based source.
    pub content: f64,
    /// Weight of the collaborative-filtering source.
    pub collaborative: f64,
    /// Weight of the association-rule source.
    pub association: f64,
}

impl Default for EnsembleWeights {
    fn default() -> Self {
        Self {
            content: 1.0,
            collaborative: 1.0,
            association: 1.0,
        }
    }
}

impl EnsembleWeights {
    /// Set the content-based weight.
    #[must_use]
    pub fn with_content(mut self, weight: f64) -> Self {
        self.content = weight;
        self
    }

    /// Set the collaborative weight.
    #[must_use]
    pub fn with_collaborative(mut self, weight: f64) -> Self {
        self.collaborative = weight;
        self
    }

    /// Set the association weight.
    #[must_use]
    pub fn with_association(mut self, weight: f64) -> Self {
        self.association = weight;
        self
    }
}

/// Which sources a profile refresh fans out to.
///
/// By default content and association refresh, collaborative does not.
/// Sources left unflagged keep their stale profile until their own update
/// runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshFlags {
    /// Refresh the content-based source (needs new interactions).
    pub content: bool,
    /// Refresh the collaborative source (needs new interactions).
    pub collaborative: bool,
    /// Reweigh the user in the association source.
    pub association: bool,
}

impl Default for RefreshFlags {
    fn default() -> Self {
        Self {
            content: true,
            collaborative: false,
            association: true,
        }
    }
}

/// Outer-merge weighted source lists into one ranked list.
///
/// Items keep first-appearance order across the inputs; each source
/// contributes `score * weight`, and a source that did not surface an item
/// contributes exactly 0 (neutral fallback, not a missing-value sentinel).
/// The result is sorted descending, ties in first-appearance order.
#[must_use]
pub fn fuse_scores(sources: &[(&[ScoredItem], f64)]) -> Vec<ScoredItem> {
    let mut order: Vec<ItemId> = Vec::new();
    let mut totals: HashMap<ItemId, f64> = HashMap::new();
    for (list, weight) in sources {
        for item in *list {
            if !totals.contains_key(&item.item_id) {
                order.push(item.item_id);
            }
            *totals.entry(item.item_id).or_insert(0.0) += item.score * weight;
        }
    }

    let mut fused: Vec<ScoredItem> = order
        .into_iter()
        .map(|item_id| ScoredItem {
            item_id,
            score: totals[&item_id],
        })
        .collect();
    sort_by_score(&mut fused);
    fused
}

/// Weighted-sum combiner over three recommendation sources.
///
/// Implements [`Recommender`] itself, so it can stand in wherever a single
/// source is expected.
///
/// # Type parameters
///
/// - `C`: the content-based source
/// - `F`: the collaborative-filtering source
pub struct HybridRecommender<C: Recommender, F: Recommender> {
    content: C,
    collaborative: F,
    association: AssociationRecommender,
    weights: EnsembleWeights,
    catalog: Option<ItemCatalog>,
}

impl<C: Recommender, F: Recommender> HybridRecommender<C, F> {
    /// Combine three fitted sources with default weights.
    #[must_use]
    pub fn new(content: C, collaborative: F, association: AssociationRecommender) -> Self {
        Self {
            content,
            collaborative,
            association,
            weights: EnsembleWeights::default(),
            catalog: None,
        }
    }

    /// Set the fusion weights.
    #[must_use]
    pub fn with_weights(mut self, weights: EnsembleWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Attach an item catalog for detailed output.
    #[must_use]
    pub fn with_catalog(mut self, catalog: ItemCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// The current fusion weights.
    #[must_use]
    pub fn weights(&self) -> EnsembleWeights {
        self.weights
    }

    /// The underlying association source.
    #[must_use]
    pub fn association(&self) -> &AssociationRecommender {
        &self.association
    }

    /// Selectively refresh per-source user state.
    ///
    /// Content and collaborative refreshes replace those sources' interaction
    /// sets and therefore require `new_interactions`; they are skipped when it
    /// is `None`. The association refresh reweighs the user from the held
    /// weighting table.
    ///
    /// # Errors
    ///
    /// Propagates the first failing source update.
    pub fn refresh_user_profile(
        &mut self,
        user_id: UserId,
        new_interactions: Option<&[Interaction]>,
        flags: RefreshFlags,
    ) -> Result<()> {
        if flags.content {
            if let Some(interactions) = new_interactions {
                self.content.update_interactions(interactions.to_vec())?;
                self.content.update_user_profile(user_id)?;
            }
        }
        if flags.collaborative {
            if let Some(interactions) = new_interactions {
                self.collaborative
                    .update_interactions(interactions.to_vec())?;
            }
        }
        if flags.association {
            self.association.update_user_profile(user_id)?;
        }
        Ok(())
    }
}

impl<C: Recommender, F: Recommender> Recommender for HybridRecommender<C, F> {
    fn name(&self) -> &str {
        MODEL_NAME
    }

    fn recommend(&self, user_id: UserId, options: RecommendOptions) -> Result<Vec<ScoredItem>> {
        let pool = RecommendOptions::default()
            .with_ignore_interacted(options.ignore_interacted)
            .with_top_n(FUSION_POOL_SIZE);
        let content = self.content.recommend(user_id, pool)?;
        let collaborative = self.collaborative.recommend(user_id, pool)?;
        let association = self.association.recommend(user_id, pool)?;

        let mut fused = fuse_scores(&[
            (&content, self.weights.content),
            (&collaborative, self.weights.collaborative),
            (&association, self.weights.association),
        ]);
        fused.truncate(options.top_n);
        Ok(dedup_by_item(fused))
    }

    fn recommend_detailed(
        &self,
        user_id: UserId,
        options: RecommendOptions,
    ) -> Result<Vec<DetailedItem>> {
        let items = self.recommend(user_id, options)?;
        let catalog = self
            .catalog
            .as_ref()
            .ok_or_else(|| RecomendarError::MetadataRequired {
                model: MODEL_NAME.to_string(),
            })?;
        Ok(items
            .into_iter()
            .map(|item| DetailedItem {
                item_id: item.item_id,
                score: item.score,
                details: catalog.get(item.item_id).cloned(),
            })
            .collect())
    }

    fn update_interactions(&mut self, interactions: Vec<Interaction>) -> Result<()> {
        self.content.update_interactions(interactions.clone())?;
        self.collaborative.update_interactions(interactions.clone())?;
        self.association.update_interactions(interactions)
    }

    fn update_user_profile(&mut self, user_id: UserId) -> Result<()> {
        self.refresh_user_profile(user_id, None, RefreshFlags::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::EventWeights;

    /// Fixed-output source for exercising the combiner.
    struct StaticSource {
        name: &'static str,
        list: Vec<ScoredItem>,
        updates: usize,
    }

    impl StaticSource {
        fn new(name: &'static str, list: Vec<(ItemId, f64)>) -> Self {
            Self {
                name,
                list: list
                    .into_iter()
                    .map(|(item_id, score)| ScoredItem { item_id, score })
                    .collect(),
                updates: 0,
            }
        }
    }

    impl Recommender for StaticSource {
        fn name(&self) -> &str {
            self.name
        }

        fn recommend(&self, _user_id: UserId, options: RecommendOptions) -> Result<Vec<ScoredItem>> {
            let mut list = self.list.clone();
            list.truncate(options.top_n);
            Ok(list)
        }

        fn recommend_detailed(
            &self,
            _user_id: UserId,
            _options: RecommendOptions,
        ) -> Result<Vec<DetailedItem>> {
            Err(RecomendarError::MetadataRequired {
                model: self.name.to_string(),
            })
        }

        fn update_interactions(&mut self, _interactions: Vec<Interaction>) -> Result<()> {
            self.updates += 1;
            Ok(())
        }

        fn update_user_profile(&mut self, _user_id: UserId) -> Result<()> {
            Ok(())
        }
    }

    fn empty_association() -> AssociationRecommender {
        let mut model = AssociationRecommender::new(EventWeights::default());
        model.fit(vec![]).unwrap();
        model
    }

    fn items(list: &[ScoredItem]) -> Vec<ItemId> {
        list.iter().map(|i| i.item_id).collect()
    }

    #[test]
    fn test_fuse_outer_merge_with_neutral_fill() {
        let cb = [ScoredItem {
            item_id: 7,
            score: 5.0,
        }];
        let ap = [ScoredItem {
            item_id: 7,
            score: 2.0,
        }];
        let fused = fuse_scores(&[(&cb, 1.0), (&[], 1.0), (&ap, 1.0)]);
        // 5.0*1 + 0*1 + 2.0*1
        assert_eq!(fused.len(), 1);
        assert_eq!(fused[0].item_id, 7);
        assert!((fused[0].score - 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_fuse_applies_source_weights() {
        let cb = [ScoredItem {
            item_id: 1,
            score: 1.0,
        }];
        let cf = [ScoredItem {
            item_id: 2,
            score: 1.0,
        }];
        let fused = fuse_scores(&[(&cb, 0.5), (&cf, 3.0)]);
        assert_eq!(items(&fused), vec![2, 1]);
        assert!((fused[0].score - 3.0).abs() < 1e-12);
        assert!((fused[1].score - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_fuse_sorted_with_stable_ties() {
        let a = [
            ScoredItem {
                item_id: 1,
                score: 1.0,
            },
            ScoredItem {
                item_id: 2,
                score: 1.0,
            },
        ];
        let b = [ScoredItem {
            item_id: 3,
            score: 1.0,
        }];
        let fused = fuse_scores(&[(&a, 1.0), (&b, 1.0)]);
        // All tied; first-appearance order holds.
        assert_eq!(items(&fused), vec![1, 2, 3]);
    }

    #[test]
    fn test_doubling_a_weight_never_demotes_its_items() {
        let cb = [
            ScoredItem {
                item_id: 1,
                score: 2.0,
            },
            ScoredItem {
                item_id: 2,
                score: 1.0,
            },
        ];
        let cf = [ScoredItem {
            item_id: 3,
            score: 3.0,
        }];

        let before = fuse_scores(&[(&cb, 1.0), (&cf, 1.0)]);
        let after = fuse_scores(&[(&cb, 2.0), (&cf, 1.0)]);

        for item in items(&cb) {
            let rank_before = before.iter().position(|r| r.item_id == item).unwrap();
            let rank_after = after.iter().position(|r| r.item_id == item).unwrap();
            assert!(rank_after <= rank_before);
        }
    }

    #[test]
    fn test_hybrid_recommend_merges_three_sources() {
        let cb = StaticSource::new("cb", vec![(1, 5.0), (2, 1.0)]);
        let cf = StaticSource::new("cf", vec![(2, 4.0)]);
        let hybrid = HybridRecommender::new(cb, cf, empty_association());

        let recs = hybrid.recommend(1, RecommendOptions::default()).unwrap();
        // Item 2: 1.0 + 4.0 = 5.0 ties item 1's 5.0; item 1 appeared first.
        assert_eq!(items(&recs), vec![1, 2]);
        assert!((recs[0].score - 5.0).abs() < 1e-12);
        assert!((recs[1].score - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_hybrid_respects_top_n() {
        let cb = StaticSource::new("cb", vec![(1, 5.0), (2, 4.0), (3, 3.0)]);
        let cf = StaticSource::new("cf", vec![]);
        let hybrid = HybridRecommender::new(cb, cf, empty_association());
        let recs = hybrid
            .recommend(1, RecommendOptions::default().with_top_n(2))
            .unwrap();
        assert_eq!(items(&recs), vec![1, 2]);
    }

    #[test]
    fn test_hybrid_weighted_reordering() {
        let cb = StaticSource::new("cb", vec![(1, 5.0)]);
        let cf = StaticSource::new("cf", vec![(2, 2.0)]);
        let hybrid = HybridRecommender::new(cb, cf, empty_association())
            .with_weights(EnsembleWeights::default().with_collaborative(10.0));
        let recs = hybrid.recommend(1, RecommendOptions::default()).unwrap();
        // 2*10 = 20 beats 5*1.
        assert_eq!(items(&recs), vec![2, 1]);
    }

    #[test]
    fn test_hybrid_name() {
        let hybrid = HybridRecommender::new(
            StaticSource::new("cb", vec![]),
            StaticSource::new("cf", vec![]),
            empty_association(),
        );
        assert_eq!(hybrid.name(), "hybrid");
    }

    #[test]
    fn test_hybrid_detailed_requires_catalog() {
        let hybrid = HybridRecommender::new(
            StaticSource::new("cb", vec![(1, 1.0)]),
            StaticSource::new("cf", vec![]),
            empty_association(),
        );
        let err = hybrid
            .recommend_detailed(1, RecommendOptions::default())
            .unwrap_err();
        assert!(matches!(err, RecomendarError::MetadataRequired { .. }));
    }

    #[test]
    fn test_hybrid_detailed_with_catalog() {
        use crate::catalog::{ItemCatalog, ItemDetails};
        let hybrid = HybridRecommender::new(
            StaticSource::new("cb", vec![(1, 1.0)]),
            StaticSource::new("cf", vec![]),
            empty_association(),
        )
        .with_catalog(ItemCatalog::new().with_item(1, ItemDetails::new("One", "https://ex.am/1", "en")));
        let recs = hybrid
            .recommend_detailed(1, RecommendOptions::default())
            .unwrap();
        assert_eq!(recs[0].details.as_ref().unwrap().title, "One");
    }

    #[test]
    fn test_update_interactions_fans_out_to_all_sources() {
        let mut hybrid = HybridRecommender::new(
            StaticSource::new("cb", vec![]),
            StaticSource::new("cf", vec![]),
            empty_association(),
        );
        hybrid
            .update_interactions(vec![Interaction::new(1, 10, "VIEW")])
            .unwrap();
        assert_eq!(hybrid.content.updates, 1);
        assert_eq!(hybrid.collaborative.updates, 1);
        assert!(hybrid.association.rules_stale());
    }

    #[test]
    fn test_refresh_flags_select_sources() {
        let mut hybrid = HybridRecommender::new(
            StaticSource::new("cb", vec![]),
            StaticSource::new("cf", vec![]),
            empty_association(),
        );
        let new_rows = vec![Interaction::new(1, 10, "VIEW")];

        // Default flags: content yes, collaborative no.
        hybrid
            .refresh_user_profile(1, Some(&new_rows), RefreshFlags::default())
            .unwrap();
        assert_eq!(hybrid.content.updates, 1);
        assert_eq!(hybrid.collaborative.updates, 0);

        let all = RefreshFlags {
            content: true,
            collaborative: true,
            association: true,
        };
        hybrid.refresh_user_profile(1, Some(&new_rows), all).unwrap();
        assert_eq!(hybrid.content.updates, 2);
        assert_eq!(hybrid.collaborative.updates, 1);
    }

    #[test]
    fn test_refresh_without_interactions_skips_replacement_sources() {
        let mut hybrid = HybridRecommender::new(
            StaticSource::new("cb", vec![]),
            StaticSource::new("cf", vec![]),
            empty_association(),
        );
        hybrid
            .refresh_user_profile(1, None, RefreshFlags::default())
            .unwrap();
        assert_eq!(hybrid.content.updates, 0);
        assert_eq!(hybrid.collaborative.updates, 0);
    }
}
