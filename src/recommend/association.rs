//! Association-rule recommender.
//!
//! Mines pairwise co-occurrence rules from per-user transactions at fit time,
//! then scores candidates for a user by joining their interacted items against
//! the rules' antecedents: each match contributes `ln(lift * strength)`.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::ItemCatalog;
use crate::error::{RecomendarError, Result};
use crate::interaction::{EventWeights, Interaction, InteractionLog};
use crate::mining::{AssociationRule, RuleMiner};
use crate::recommend::{dedup_by_item, sort_by_score, DetailedItem, RecommendOptions, ScoredItem};
use crate::traits::Recommender;
use crate::{ItemId, UserId};

const MODEL_NAME: &str = "apriori";

/// Recommender backed by mined association rules.
///
/// # Examples
///
/// ```
/// use recomendar::prelude::*;
///
/// let interactions = vec![
///     Interaction::new(1, 10, "VIEW"),
///     Interaction::new(1, 20, "LIKE"),
///     Interaction::new(2, 10, "VIEW"),
///     Interaction::new(2, 20, "VIEW"),
///     Interaction::new(3, 10, "FOLLOW"),
/// ];
///
/// let mut model = AssociationRecommender::new(EventWeights::default())
///     .with_min_support(0.5)
///     .with_min_lift(1.0)
///     .with_min_interactions(2);
/// model.fit(interactions).unwrap();
///
/// // User 3 interacted with item 10; the mined rule 10 => 20 surfaces 20.
/// let recs = model.recommend(3, RecommendOptions::default()).unwrap();
/// assert_eq!(recs[0].item_id, 20);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssociationRecommender {
    weights: EventWeights,
    min_support: f64,
    min_lift: f64,
    min_interactions: usize,
    catalog: Option<ItemCatalog>,
    log: InteractionLog,
    rules: Vec<AssociationRule>,
    by_antecedent: BTreeMap<ItemId, Vec<usize>>,
    rules_stale: bool,
}

impl AssociationRecommender {
    /// Create an unfitted recommender with default mining thresholds
    /// (`min_support` 0.005, `min_lift` 1.0, `min_interactions` 5).
    #[must_use]
    pub fn new(weights: EventWeights) -> Self {
        Self {
            weights,
            min_support: 0.005,
            min_lift: 1.0,
            min_interactions: 5,
            catalog: None,
            log: InteractionLog::default(),
            rules: Vec::new(),
            by_antecedent: BTreeMap::new(),
            rules_stale: false,
        }
    }

    /// Set the minimum itemset support for mining.
    #[must_use]
    pub fn with_min_support(mut self, min_support: f64) -> Self {
        self.min_support = min_support;
        self
    }

    /// Set the minimum rule lift for mining.
    #[must_use]
    pub fn with_min_lift(mut self, min_lift: f64) -> Self {
        self.min_lift = min_lift;
        self
    }

    /// Set the distinct-item threshold for a user to enter the mining corpus.
    #[must_use]
    pub fn with_min_interactions(mut self, min_interactions: usize) -> Self {
        self.min_interactions = min_interactions;
        self
    }

    /// Attach an item catalog for detailed output.
    #[must_use]
    pub fn with_catalog(mut self, catalog: ItemCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Fit the model: weight interactions, build transactions, mine rules.
    ///
    /// # Errors
    ///
    /// Returns `InvalidHyperparameter` on a bad weighting table or mining
    /// threshold, and `UnknownEventType` on an unmapped event; in either case
    /// the previous state is left untouched.
    pub fn fit(&mut self, interactions: Vec<Interaction>) -> Result<()> {
        self.weights.validate()?;
        let log = InteractionLog::from_interactions(interactions, &self.weights)?;
        let transactions = log.transactions(self.min_interactions);

        let mut miner = RuleMiner::new()
            .with_min_support(self.min_support)
            .with_min_lift(self.min_lift);
        miner.fit(&transactions)?;

        self.log = log;
        self.rules = miner.into_rules();
        self.by_antecedent = Self::index_rules(&self.rules);
        self.rules_stale = false;
        Ok(())
    }

    fn index_rules(rules: &[AssociationRule]) -> BTreeMap<ItemId, Vec<usize>> {
        let mut index: BTreeMap<ItemId, Vec<usize>> = BTreeMap::new();
        for (i, rule) in rules.iter().enumerate() {
            index.entry(rule.antecedent).or_default().push(i);
        }
        index
    }

    /// The mined rules, sorted by lift descending.
    #[must_use]
    pub fn rules(&self) -> &[AssociationRule] {
        &self.rules
    }

    /// True after `update_interactions` until `rebuild_rules`: the rule set
    /// was mined from an older interaction snapshot.
    #[must_use]
    pub fn rules_stale(&self) -> bool {
        self.rules_stale
    }

    /// Re-mine rules from the current interaction set and clear the
    /// staleness flag.
    ///
    /// # Errors
    ///
    /// Returns `InvalidHyperparameter` when a mining threshold is out of
    /// range.
    pub fn rebuild_rules(&mut self) -> Result<()> {
        let transactions = self.log.transactions(self.min_interactions);
        let mut miner = RuleMiner::new()
            .with_min_support(self.min_support)
            .with_min_lift(self.min_lift);
        miner.fit(&transactions)?;
        self.rules = miner.into_rules();
        self.by_antecedent = Self::index_rules(&self.rules);
        self.rules_stale = false;
        Ok(())
    }

    /// Score candidates for one user by joining interacted items against rule
    /// antecedents.
    ///
    /// Every interacted row joins independently, so an item interacted with
    /// twice contributes two candidate entries per matching rule; the final
    /// dedup keeps the highest-scored one. Candidates whose `lift * strength`
    /// is non-positive are excluded (unreachable with validated weights and
    /// thresholds, but hand-assembled rule sets are not trusted).
    fn scored_candidates(&self, user_id: UserId, ignore_interacted: bool) -> Vec<ScoredItem> {
        let mut candidates: Vec<ScoredItem> = Vec::new();
        for (item_id, strength) in self.log.user_items(user_id) {
            let Some(matches) = self.by_antecedent.get(&item_id) else {
                continue;
            };
            for &rule_idx in matches {
                let rule = &self.rules[rule_idx];
                let product = rule.lift * strength;
                if product > 0.0 {
                    candidates.push(ScoredItem {
                        item_id: rule.consequent,
                        score: product.ln(),
                    });
                }
            }
        }

        if ignore_interacted {
            let interacted = self.log.interacted_items(user_id);
            candidates.retain(|c| !interacted.contains(&c.item_id));
        }
        candidates
    }

    fn annotate(&self, items: Vec<ScoredItem>) -> Result<Vec<DetailedItem>> {
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

    /// Serialize the fitted model to a file with bincode.
    ///
    /// # Errors
    ///
    /// Returns `FormatError` on serialization failure, `Io` on write failure.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = bincode::serialize(self).map_err(|e| RecomendarError::FormatError {
            message: format!("model serialization failed: {e}"),
        })?;
        std::fs::write(path, bytes).map_err(RecomendarError::Io)?;
        Ok(())
    }

    /// Load a model previously written by [`AssociationRecommender::save`].
    ///
    /// # Errors
    ///
    /// Returns `Io` on read failure, `FormatError` on corrupt data.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(RecomendarError::Io)?;
        bincode::deserialize(&bytes).map_err(|e| RecomendarError::FormatError {
            message: format!("model deserialization failed: {e}"),
        })
    }
}

impl Recommender for AssociationRecommender {
    fn name(&self) -> &str {
        MODEL_NAME
    }

    fn recommend(&self, user_id: UserId, options: RecommendOptions) -> Result<Vec<ScoredItem>> {
        // A user with no interactions (including one below the mining
        // threshold whose items match no antecedent) gets an empty list.
        let mut candidates = self.scored_candidates(user_id, options.ignore_interacted);
        sort_by_score(&mut candidates);
        candidates.truncate(options.top_n);
        Ok(dedup_by_item(candidates))
    }

    fn recommend_detailed(
        &self,
        user_id: UserId,
        options: RecommendOptions,
    ) -> Result<Vec<DetailedItem>> {
        let items = self.recommend(user_id, options)?;
        self.annotate(items)
    }

    fn update_interactions(&mut self, interactions: Vec<Interaction>) -> Result<()> {
        let log = InteractionLog::from_interactions(interactions, &self.weights)?;
        self.log = log;
        // Rules keep serving the old snapshot until rebuild_rules.
        self.rules_stale = true;
        Ok(())
    }

    fn update_user_profile(&mut self, user_id: UserId) -> Result<()> {
        self.log.reweigh_user(user_id, &self.weights)
    }
}
