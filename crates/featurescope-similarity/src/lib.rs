//! # FeatureScope Similarity
//!
//! Stateless scoring of how alike two feature records are.
//!
//! ## Features
//!
//! - **Six sub-metrics** in `[0, 1]`: name, description, category, browser support,
//!   baseline tier and baseline date proximity
//! - **Weighted composite**: caller-supplied weights, normalized by their sum
//! - **Reasons**: short explanations for the sub-metrics that scored high
//! - **Specialized queries**: better alternatives, upgrade paths and complementary
//!   features, each with its own weight profile and threshold

pub mod engine;
pub mod metrics;
pub mod weights;

pub use engine::{SimilarFeature, SimilarityBreakdown, SimilarityEngine, SimilarityResult};
pub use weights::SimilarityWeights;
