//! Association-rule mining over per-user transactions.
//!
//! Discovers pairwise item co-occurrence rules in transactional data. The
//! miner is restricted to itemsets of size <= 2 because downstream scoring
//! only joins single interacted items against single consequents.
//!
//! # Example
//!
//! ```
//! use recomendar::mining::RuleMiner;
//!
//! // Each transaction is one user's set of distinct item ids.
//! let transactions = vec![
//!     vec![1, 2, 3],
//!     vec![1, 2],
//!     vec![1, 3],
//!     vec![2, 3],
//! ];
//!
//! let mut miner = RuleMiner::new().with_min_support(0.5).with_min_lift(0.5);
//! miner.fit(&transactions).unwrap();
//!
//! for rule in miner.rules() {
//!     println!("{} => {} (conf={:.2}, lift={:.2})",
//!         rule.antecedent, rule.consequent, rule.confidence, rule.lift);
//! }
//! ```

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{RecomendarError, Result};
use crate::ItemId;

/// Pairwise association rule: antecedent => consequent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssociationRule {
    /// Item on the left side of the rule.
    pub antecedent: ItemId,
    /// Item on the right side of the rule.
    pub consequent: ItemId,
    /// Support: P(antecedent and consequent co-occur).
    pub support: f64,
    /// Confidence: P(consequent | antecedent) = support / P(antecedent).
    pub confidence: f64,
    /// Lift: confidence / P(consequent); > 1 means positive correlation.
    pub lift: f64,
}

/// Frequent-itemset miner producing pairwise association rules.
///
/// # Algorithm
///
/// 1. Count single-item supports; keep items with support >= `min_support`
/// 2. Count pair supports over the frequent items; keep pairs with
///    support >= `min_support` (itemset length capped at 2)
/// 3. For each frequent pair {a, b}, derive a=>b and b=>a independently and
///    keep the direction(s) with lift >= `min_lift`
/// 4. Sort rules by lift descending, ties by (antecedent, consequent)
///
/// All intermediate state is ordered, so a fixed corpus and parameters always
/// produce the identical rule vector.
///
/// # Parameters
///
/// - `min_support`: minimum fraction of transactions containing the itemset,
///   in (0, 1] (default 0.005)
/// - `min_lift`: minimum lift for an emitted rule, > 0 (default 1.0, keeping
///   only non-negatively-correlated pairs)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleMiner {
    min_support: f64,
    min_lift: f64,
    rules: Vec<AssociationRule>,
}

impl Default for RuleMiner {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleMiner {
    /// Create a miner with default thresholds (`min_support` 0.005,
    /// `min_lift` 1.0).
    #[must_use]
    pub fn new() -> Self {
        Self {
            min_support: 0.005,
            min_lift: 1.0,
            rules: Vec::new(),
        }
    }

    /// Set the minimum support threshold, in (0, 1].
    #[must_use]
    pub fn with_min_support(mut self, min_support: f64) -> Self {
        self.min_support = min_support;
        self
    }

    /// Set the minimum lift threshold, > 0.
    #[must_use]
    pub fn with_min_lift(mut self, min_lift: f64) -> Self {
        self.min_lift = min_lift;
        self
    }

    /// Minimum support currently configured.
    #[must_use]
    pub fn min_support(&self) -> f64 {
        self.min_support
    }

    /// Minimum lift currently configured.
    #[must_use]
    pub fn min_lift(&self) -> f64 {
        self.min_lift
    }

    fn validate_params(&self) -> Result<()> {
        if !self.min_support.is_finite() || self.min_support <= 0.0 || self.min_support > 1.0 {
            return Err(RecomendarError::invalid_hyperparameter(
                "min_support",
                self.min_support,
                "in (0, 1]",
            ));
        }
        if !self.min_lift.is_finite() || self.min_lift <= 0.0 {
            return Err(RecomendarError::invalid_hyperparameter(
                "min_lift",
                self.min_lift,
                "> 0",
            ));
        }
        Ok(())
    }

    /// Mine rules from the transaction corpus.
    ///
    /// An empty corpus is not an error; it yields an empty rule set.
    ///
    /// # Errors
    ///
    /// Returns `InvalidHyperparameter` when a threshold is out of range.
    pub fn fit(&mut self, transactions: &[Vec<ItemId>]) -> Result<()> {
        self.validate_params()?;
        self.rules = Vec::new();

        if transactions.is_empty() {
            return Ok(());
        }

        let baskets: Vec<BTreeSet<ItemId>> = transactions
            .iter()
            .map(|t| t.iter().copied().collect())
            .collect();
        let n = baskets.len() as f64;

        // Frequent single items.
        let mut item_counts: BTreeMap<ItemId, usize> = BTreeMap::new();
        for basket in &baskets {
            for &item in basket {
                *item_counts.entry(item).or_insert(0) += 1;
            }
        }
        let single_support: BTreeMap<ItemId, f64> = item_counts
            .into_iter()
            .filter_map(|(item, count)| {
                let support = count as f64 / n;
                (support >= self.min_support).then_some((item, support))
            })
            .collect();

        // Frequent pairs over the surviving items.
        let frequent: Vec<ItemId> = single_support.keys().copied().collect();
        let mut pair_counts: BTreeMap<(ItemId, ItemId), usize> = BTreeMap::new();
        for basket in &baskets {
            let present: Vec<ItemId> = frequent
                .iter()
                .copied()
                .filter(|item| basket.contains(item))
                .collect();
            for i in 0..present.len() {
                for j in (i + 1)..present.len() {
                    *pair_counts.entry((present[i], present[j])).or_insert(0) += 1;
                }
            }
        }

        // Derive both rule directions per frequent pair.
        for ((a, b), count) in pair_counts {
            let support = count as f64 / n;
            if support < self.min_support {
                continue;
            }
            for (antecedent, consequent) in [(a, b), (b, a)] {
                let confidence = support / single_support[&antecedent];
                let lift = confidence / single_support[&consequent];
                if lift >= self.min_lift {
                    self.rules.push(AssociationRule {
                        antecedent,
                        consequent,
                        support,
                        confidence,
                        lift,
                    });
                }
            }
        }

        self.rules.sort_by(|x, y| {
            y.lift
                .total_cmp(&x.lift)
                .then_with(|| (x.antecedent, x.consequent).cmp(&(y.antecedent, y.consequent)))
        });
        Ok(())
    }

    /// The mined rules, sorted by lift descending.
    #[must_use]
    pub fn rules(&self) -> &[AssociationRule] {
        &self.rules
    }

    /// Consume the miner, returning its rules.
    #[must_use]
    pub fn into_rules(self) -> Vec<AssociationRule> {
        self.rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basket_corpus() -> Vec<Vec<ItemId>> {
        vec![vec![1, 2, 3], vec![1, 2], vec![1, 3], vec![2, 3]]
    }

    #[test]
    fn test_miner_defaults() {
        let miner = RuleMiner::new();
        assert_eq!(miner.min_support(), 0.005);
        assert_eq!(miner.min_lift(), 1.0);
        assert!(miner.rules().is_empty());
    }

    #[test]
    fn test_builder_setters() {
        let miner = RuleMiner::new().with_min_support(0.3).with_min_lift(1.2);
        assert_eq!(miner.min_support(), 0.3);
        assert_eq!(miner.min_lift(), 1.2);
    }

    #[test]
    fn test_invalid_min_support() {
        let mut miner = RuleMiner::new().with_min_support(0.0);
        let err = miner.fit(&basket_corpus()).unwrap_err();
        assert!(matches!(err, RecomendarError::InvalidHyperparameter { .. }));

        let mut miner = RuleMiner::new().with_min_support(1.5);
        assert!(miner.fit(&basket_corpus()).is_err());
    }

    #[test]
    fn test_invalid_min_lift() {
        let mut miner = RuleMiner::new().with_min_lift(-1.0);
        let err = miner.fit(&basket_corpus()).unwrap_err();
        assert!(matches!(err, RecomendarError::InvalidHyperparameter { .. }));
    }

    #[test]
    fn test_empty_corpus_yields_empty_rules() {
        let mut miner = RuleMiner::new();
        miner.fit(&[]).unwrap();
        assert!(miner.rules().is_empty());
    }

    #[test]
    fn test_confidence_and_lift_values() {
        let mut miner = RuleMiner::new().with_min_support(0.5).with_min_lift(0.1);
        miner.fit(&basket_corpus()).unwrap();

        // {1,2} co-occurs in 2 of 4 baskets; P(1) = P(2) = 0.75.
        let rule = miner
            .rules()
            .iter()
            .find(|r| r.antecedent == 1 && r.consequent == 2)
            .expect("rule 1 => 2");
        assert!((rule.support - 0.5).abs() < 1e-12);
        assert!((rule.confidence - 2.0 / 3.0).abs() < 1e-12);
        assert!((rule.lift - 8.0 / 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_thresholds_respected() {
        let mut miner = RuleMiner::new().with_min_support(0.5).with_min_lift(0.5);
        miner.fit(&basket_corpus()).unwrap();
        assert!(!miner.rules().is_empty());
        for rule in miner.rules() {
            assert!(rule.support >= 0.5);
            assert!(rule.lift >= 0.5);
        }
    }

    #[test]
    fn test_min_lift_filters_negative_correlation() {
        // In this corpus every pair has lift 8/9 < 1.
        let mut miner = RuleMiner::new().with_min_support(0.5).with_min_lift(1.0);
        miner.fit(&basket_corpus()).unwrap();
        assert!(miner.rules().is_empty());
    }

    #[test]
    fn test_support_threshold_scenario() {
        // {A,B} co-occurs in 2 of 3 baskets, {A,C} in 1 of 3.
        let (a, b, c) = (100, 200, 300);
        let transactions = vec![vec![a, b], vec![a, b], vec![a, c]];
        let mut miner = RuleMiner::new().with_min_support(0.3).with_min_lift(1.0);
        miner.fit(&transactions).unwrap();

        let ab = miner
            .rules()
            .iter()
            .find(|r| r.antecedent == a && r.consequent == b)
            .expect("rule A => B");
        assert!((ab.support - 2.0 / 3.0).abs() < 1e-12);
        assert!(ab.lift >= 1.0);
    }

    #[test]
    fn test_deterministic_output() {
        let transactions = vec![
            vec![5, 3, 9],
            vec![3, 5],
            vec![9, 5, 1],
            vec![1, 3],
            vec![5, 9],
        ];
        let mut first = RuleMiner::new().with_min_support(0.2).with_min_lift(0.1);
        first.fit(&transactions).unwrap();
        let mut second = RuleMiner::new().with_min_support(0.2).with_min_lift(0.1);
        second.fit(&transactions).unwrap();
        assert_eq!(first.rules(), second.rules());
    }

    #[test]
    fn test_rules_sorted_by_lift_then_pair() {
        let transactions = vec![
            vec![1, 2],
            vec![1, 2],
            vec![1, 2, 3],
            vec![3, 4],
            vec![3, 4],
            vec![2, 4],
        ];
        let mut miner = RuleMiner::new().with_min_support(0.1).with_min_lift(0.1);
        miner.fit(&transactions).unwrap();
        let rules = miner.rules();
        for pair in rules.windows(2) {
            let ordered = pair[0].lift > pair[1].lift
                || (pair[0].lift == pair[1].lift
                    && (pair[0].antecedent, pair[0].consequent)
                        < (pair[1].antecedent, pair[1].consequent));
            assert!(ordered, "rules out of order: {pair:?}");
        }
    }

    #[test]
    fn test_duplicate_items_in_transaction_counted_once() {
        let transactions = vec![vec![1, 1, 2], vec![1, 2, 2]];
        let mut miner = RuleMiner::new().with_min_support(0.5).with_min_lift(0.1);
        miner.fit(&transactions).unwrap();
        let rule = miner
            .rules()
            .iter()
            .find(|r| r.antecedent == 1 && r.consequent == 2)
            .expect("rule 1 => 2");
        assert!((rule.support - 1.0).abs() < 1e-12);
        assert!((rule.confidence - 1.0).abs() < 1e-12);
        assert!((rule.lift - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_item_transactions_produce_no_rules() {
        let transactions = vec![vec![1], vec![2], vec![3]];
        let mut miner = RuleMiner::new().with_min_support(0.1).with_min_lift(0.1);
        miner.fit(&transactions).unwrap();
        assert!(miner.rules().is_empty());
    }

    #[test]
    fn test_into_rules() {
        let mut miner = RuleMiner::new().with_min_support(0.5).with_min_lift(0.1);
        miner.fit(&basket_corpus()).unwrap();
        let count = miner.rules().len();
        let rules = miner.into_rules();
        assert_eq!(rules.len(), count);
    }
}
