//! Core trait for recommendation sources.
//!
//! Every source in the system, association-rule based, hybrid, or an external
//! content-based / collaborative model, implements the same contract, so a
//! hybrid combiner can be used anywhere a single source is expected.

use crate::error::Result;
use crate::interaction::Interaction;
use crate::recommend::{DetailedItem, RecommendOptions, ScoredItem};
use crate::UserId;

/// Uniform capability contract for recommendation sources.
///
/// # Examples
///
/// ```
/// use recomendar::prelude::*;
///
/// let interactions = vec![
///     Interaction::new(1, 10, "VIEW"),
///     Interaction::new(1, 11, "LIKE"),
///     Interaction::new(1, 12, "VIEW"),
///     Interaction::new(1, 13, "VIEW"),
///     Interaction::new(1, 14, "FOLLOW"),
///     Interaction::new(2, 10, "VIEW"),
///     Interaction::new(2, 11, "VIEW"),
///     Interaction::new(2, 12, "VIEW"),
///     Interaction::new(2, 13, "LIKE"),
///     Interaction::new(2, 15, "VIEW"),
/// ];
///
/// let mut model = AssociationRecommender::new(EventWeights::default())
///     .with_min_support(0.5)
///     .with_min_lift(1.0);
/// model.fit(interactions).unwrap();
///
/// let recs = model.recommend(1, RecommendOptions::default()).unwrap();
/// for rec in &recs {
///     println!("{} scored {:.3}", rec.item_id, rec.score);
/// }
/// ```
pub trait Recommender {
    /// Human-readable model name (e.g. `"apriori"`, `"hybrid"`).
    fn name(&self) -> &str;

    /// Produce a ranked, deduplicated candidate list for a user.
    ///
    /// A user absent from the interaction data yields an empty list, not an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot score candidates (source-specific).
    fn recommend(&self, user_id: UserId, options: RecommendOptions) -> Result<Vec<ScoredItem>>;

    /// Like [`Recommender::recommend`], with each row annotated from the item
    /// catalog.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataRequired`](crate::RecomendarError::MetadataRequired)
    /// when no catalog is configured.
    fn recommend_detailed(
        &self,
        user_id: UserId,
        options: RecommendOptions,
    ) -> Result<Vec<DetailedItem>>;

    /// Replace the source's full interaction set.
    ///
    /// # Errors
    ///
    /// Returns an error if the new interactions cannot be weighted
    /// (e.g. an unmapped event type); the previous state is kept.
    fn update_interactions(&mut self, interactions: Vec<Interaction>) -> Result<()>;

    /// Recompute one user's interaction strengths from the current weighting.
    ///
    /// # Errors
    ///
    /// Returns an error if reweighting fails (e.g. an unmapped event type).
    fn update_user_profile(&mut self, user_id: UserId) -> Result<()>;
}
