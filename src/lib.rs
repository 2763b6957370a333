//! Recomendar: hybrid content recommendation in pure Rust.
//!
//! Recomendar fuses three recommendation signals into one ranked list:
//! content similarity, collaborative filtering, and association rules mined
//! from co-occurring interactions. The association engine and the fusion
//! layer live here; content-based and collaborative models are external
//! sources plugged in through the [`Recommender`] trait.
//!
//! # Quick Start
//!
//! ```
//! use recomendar::prelude::*;
//!
//! let interactions = vec![
//!     Interaction::new(1, 10, "VIEW"),
//!     Interaction::new(1, 20, "LIKE"),
//!     Interaction::new(2, 10, "VIEW"),
//!     Interaction::new(2, 20, "VIEW"),
//!     Interaction::new(3, 10, "FOLLOW"),
//! ];
//!
//! let mut model = AssociationRecommender::new(EventWeights::default())
//!     .with_min_support(0.5)
//!     .with_min_lift(1.0)
//!     .with_min_interactions(2);
//! model.fit(interactions).unwrap();
//!
//! let recs = model.recommend(3, RecommendOptions::default()).unwrap();
//! assert_eq!(recs[0].item_id, 20);
//! ```
//!
//! # Modules
//!
//! - [`interaction`]: typed events, strength weighting, transaction building
//! - [`mining`]: frequent-itemset mining and pairwise association rules
//! - [`recommend`]: the association recommender and the hybrid combiner
//! - [`catalog`]: item metadata lookup for detailed output
//! - [`metrics`]: top-k ranking metrics for offline evaluation
//! - [`traits`]: the uniform [`Recommender`] contract

pub mod catalog;
pub mod error;
pub mod interaction;
pub mod metrics;
pub mod mining;
pub mod prelude;
pub mod recommend;
pub mod traits;

/// User identifier, matching the 64-bit keys of the interaction corpus.
pub type UserId = i64;
/// Item identifier, matching the 64-bit keys of the interaction corpus.
pub type ItemId = i64;

pub use error::{RecomendarError, Result};
pub use traits::Recommender;
