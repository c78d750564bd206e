//! Error types for the knowledge base

use thiserror::Error;

/// Errors raised while loading or waiting on the feature dataset
#[derive(Debug, Error)]
pub enum KnowledgeError {
    /// The data source could not produce a dataset
    #[error("Feature dataset unavailable: {reason}")]
    DatasetUnavailable { reason: String },

    /// The dataset was not valid JSON of the expected shape
    #[error("Failed to parse feature dataset: {0}")]
    Parse(#[from] serde_json::Error),

    /// Initialization did not finish within the allowed time
    #[error("Knowledge base not ready after {waited_ms}ms")]
    ReadinessTimeout { waited_ms: u64 },

    /// No record with the given id
    #[error("Unknown feature: {id}")]
    UnknownFeature { id: String },
}

/// Result type for knowledge base operations
pub type Result<T> = std::result::Result<T, KnowledgeError>;
