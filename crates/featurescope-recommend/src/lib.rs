//! # FeatureScope Recommend
//!
//! Ranked suggestions for a single web-platform feature.
//!
//! ## Features
//!
//! - **Five stages**: curated alternatives, algorithmic alternatives, upgrade paths,
//!   complementary features and language-aware contextual picks
//! - **Deterministic ranking**: one entry per feature, type priority before
//!   confidence, bounded length
//! - **Caching**: results cached per `(feature, language, project type)` for the
//!   configured TTL
//! - **Graceful degradation**: unknown features and a knowledge base that is not
//!   ready yield an empty list

pub mod context;
pub mod engine;
pub mod error;
pub mod ranking;

pub use context::RecommendationContext;
pub use engine::{
    RecommendationEngine, ALGORITHMIC_ALTERNATIVE_CAP, ALGORITHMIC_COMPLEMENTARY_CAP,
    ALGORITHMIC_UPGRADE_CAP, CONTEXTUAL_CONFIDENCE, CURATED_ALTERNATIVE_CONFIDENCE,
    CURATED_COMPLEMENTARY_CONFIDENCE, CURATED_UPGRADE_CONFIDENCE,
};
pub use error::{RecommendError, Result};
pub use ranking::rank_recommendations;
