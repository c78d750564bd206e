//! Error types for the recommendation engine

use featurescope_cache::CacheError;
use thiserror::Error;

/// Errors raised while constructing the engine.
///
/// Recommendation queries themselves never fail; they degrade to an empty list.
#[derive(Debug, Error)]
pub enum RecommendError {
    /// The result cache could not be created
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
}

/// Result type for recommendation engine construction
pub type Result<T> = std::result::Result<T, RecommendError>;
