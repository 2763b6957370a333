//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use recomendar::prelude::*;
//! ```

pub use crate::catalog::{ItemCatalog, ItemDetails};
pub use crate::error::{RecomendarError, Result};
pub use crate::interaction::{EventWeights, Interaction, InteractionLog};
pub use crate::mining::{AssociationRule, RuleMiner};
pub use crate::recommend::{
    AssociationRecommender, DetailedItem, EnsembleWeights, HybridRecommender, RecommendOptions,
    RefreshFlags, ScoredItem,
};
pub use crate::traits::Recommender;
pub use crate::{ItemId, UserId};
