//! Interaction events, event-type weighting, and transaction building.
//!
//! Raw interaction events (user viewed / liked / bookmarked an item) are
//! converted to a numeric strength per row via an [`EventWeights`] table, then
//! grouped per user into transactions for rule mining.
//!
//! # Example
//!
//! ```
//! use recomendar::interaction::{EventWeights, Interaction, InteractionLog};
//!
//! let weights = EventWeights::default();
//! let events = vec![
//!     Interaction::new(1, 10, "VIEW"),
//!     Interaction::new(1, 11, "LIKE"),
//!     Interaction::new(2, 10, "FOLLOW"),
//! ];
//! let log = InteractionLog::from_interactions(events, &weights).unwrap();
//! assert_eq!(log.user_items(1), vec![(10, 1.0), (11, 2.0)]);
//! ```

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{RecomendarError, Result};
use crate::{ItemId, UserId};

/// One raw interaction event: a user acted on an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    /// Acting user.
    pub user_id: UserId,
    /// Target item.
    pub item_id: ItemId,
    /// Event type key into the weighting table (e.g. `"VIEW"`).
    pub event_type: String,
    /// Unix timestamp, when the ingestion layer provides one.
    pub timestamp: Option<i64>,
}

impl Interaction {
    /// Create an interaction without a timestamp.
    #[must_use]
    pub fn new(user_id: UserId, item_id: ItemId, event_type: &str) -> Self {
        Self {
            user_id,
            item_id,
            event_type: event_type.to_string(),
            timestamp: None,
        }
    }

    /// Attach a timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// Mapping from event type to interaction strength.
///
/// Passed explicitly to each component at construction; there is no
/// process-wide table. The default carries the conventional content-site
/// weighting.
///
/// # Examples
///
/// ```
/// use recomendar::interaction::EventWeights;
///
/// let weights = EventWeights::default();
/// assert_eq!(weights.weight("VIEW").unwrap(), 1.0);
/// assert_eq!(weights.weight("COMMENT CREATED").unwrap(), 4.0);
/// assert!(weights.weight("SHRUG").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventWeights {
    table: BTreeMap<String, f64>,
}

impl Default for EventWeights {
    fn default() -> Self {
        let mut table = BTreeMap::new();
        table.insert("VIEW".to_string(), 1.0);
        table.insert("LIKE".to_string(), 2.0);
        table.insert("BOOKMARK".to_string(), 2.5);
        table.insert("FOLLOW".to_string(), 3.0);
        table.insert("COMMENT CREATED".to_string(), 4.0);
        Self { table }
    }
}

impl EventWeights {
    /// Create an empty weighting table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: BTreeMap::new(),
        }
    }

    /// Add or replace one event type's weight.
    #[must_use]
    pub fn with_event(mut self, event_type: &str, weight: f64) -> Self {
        self.table.insert(event_type.to_string(), weight);
        self
    }

    /// Parse a weighting table from a JSON object, e.g.
    /// `{"VIEW": 1.0, "LIKE": 2.0}`.
    ///
    /// # Errors
    ///
    /// Returns `FormatError` on malformed JSON, or `InvalidHyperparameter` if
    /// any parsed weight is non-positive or non-finite.
    pub fn from_json(json: &str) -> Result<Self> {
        let table: BTreeMap<String, f64> =
            serde_json::from_str(json).map_err(|e| RecomendarError::FormatError {
                message: format!("event weights JSON: {e}"),
            })?;
        let weights = Self { table };
        weights.validate()?;
        Ok(weights)
    }

    /// Look up the strength for an event type.
    ///
    /// # Errors
    ///
    /// Returns `UnknownEventType` when the event type is not in the table.
    pub fn weight(&self, event_type: &str) -> Result<f64> {
        self.table
            .get(event_type)
            .copied()
            .ok_or_else(|| RecomendarError::unknown_event_type(event_type))
    }

    /// Check that every weight is positive and finite.
    ///
    /// Strengths feed `ln(lift * strength)` scoring downstream, so the table
    /// must not contain zero, negative, or non-finite entries.
    ///
    /// # Errors
    ///
    /// Returns `InvalidHyperparameter` naming the offending event type.
    pub fn validate(&self) -> Result<()> {
        for (event_type, &weight) in &self.table {
            if !weight.is_finite() || weight <= 0.0 {
                return Err(RecomendarError::invalid_hyperparameter(
                    &format!("event_weights[{event_type}]"),
                    weight,
                    "positive finite strength",
                ));
            }
        }
        Ok(())
    }

    /// Number of mapped event types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// True when no event types are mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// The full interaction set with materialized strengths.
///
/// Row order is the ingestion order; per-user lookups preserve it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InteractionLog {
    rows: Vec<Interaction>,
    strengths: Vec<f64>,
}

impl InteractionLog {
    /// Build a log from raw events, materializing the strength of every row.
    ///
    /// # Errors
    ///
    /// Returns `UnknownEventType` on the first row whose event type is not in
    /// the table; no partial log is produced.
    pub fn from_interactions(rows: Vec<Interaction>, weights: &EventWeights) -> Result<Self> {
        let strengths = rows
            .iter()
            .map(|row| weights.weight(&row.event_type))
            .collect::<Result<Vec<f64>>>()?;
        Ok(Self { rows, strengths })
    }

    /// Recompute strengths in place for one user's rows only.
    ///
    /// A user with no rows is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `UnknownEventType` if any of the user's rows no longer maps;
    /// rows before the failing one keep their new strength (the table is the
    /// same for all rows, so in practice the update is all-or-nothing).
    pub fn reweigh_user(&mut self, user_id: UserId, weights: &EventWeights) -> Result<()> {
        for (row, strength) in self.rows.iter().zip(self.strengths.iter_mut()) {
            if row.user_id == user_id {
                *strength = weights.weight(&row.event_type)?;
            }
        }
        Ok(())
    }

    /// True when the user has at least one row.
    #[must_use]
    pub fn contains_user(&self, user_id: UserId) -> bool {
        self.rows.iter().any(|row| row.user_id == user_id)
    }

    /// The user's `(item, strength)` rows in log order, duplicates preserved.
    #[must_use]
    pub fn user_items(&self, user_id: UserId) -> Vec<(ItemId, f64)> {
        self.rows
            .iter()
            .zip(self.strengths.iter())
            .filter(|(row, _)| row.user_id == user_id)
            .map(|(row, &strength)| (row.item_id, strength))
            .collect()
    }

    /// The set of distinct items the user has interacted with.
    #[must_use]
    pub fn interacted_items(&self, user_id: UserId) -> BTreeSet<ItemId> {
        self.rows
            .iter()
            .filter(|row| row.user_id == user_id)
            .map(|row| row.item_id)
            .collect()
    }

    /// Build the mining corpus: one transaction per qualifying user.
    ///
    /// A user qualifies with at least `min_interactions` distinct items. Each
    /// transaction lists the user's distinct item ids in first-appearance
    /// order; users iterate in first-appearance order, so the corpus is
    /// deterministic for a fixed log.
    #[must_use]
    pub fn transactions(&self, min_interactions: usize) -> Vec<Vec<ItemId>> {
        let mut distinct: BTreeMap<UserId, BTreeSet<ItemId>> = BTreeMap::new();
        for row in &self.rows {
            distinct.entry(row.user_id).or_default().insert(row.item_id);
        }

        let qualifying: BTreeSet<UserId> = distinct
            .iter()
            .filter(|(_, items)| items.len() >= min_interactions)
            .map(|(&user, _)| user)
            .collect();

        let mut order: Vec<UserId> = Vec::new();
        let mut baskets: BTreeMap<UserId, Vec<ItemId>> = BTreeMap::new();
        let mut seen: BTreeMap<UserId, BTreeSet<ItemId>> = BTreeMap::new();
        for row in &self.rows {
            if !qualifying.contains(&row.user_id) {
                continue;
            }
            if !baskets.contains_key(&row.user_id) {
                order.push(row.user_id);
            }
            let basket = baskets.entry(row.user_id).or_default();
            if seen.entry(row.user_id).or_default().insert(row.item_id) {
                basket.push(row.item_id);
            }
        }

        order
            .into_iter()
            .map(|user| baskets.remove(&user).unwrap_or_default())
            .collect()
    }

    /// Number of rows in the log.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the log has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
