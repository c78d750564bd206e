//! Error types for project analysis

use featurescope_cache::CacheError;
use featurescope_knowledge::KnowledgeError;
use thiserror::Error;

/// Errors raised while analyzing a project
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// One document could not be processed; counted and skipped by the batch
    #[error("Failed to analyze {file}: {reason}")]
    Document { file: String, reason: String },

    /// The knowledge base was not ready in time
    #[error("Knowledge base error: {0}")]
    KnowledgeBase(#[from] KnowledgeError),

    /// The result cache could not be created
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
}

impl AnalysisError {
    /// Per-document failure
    pub fn document(file: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Document {
            file: file.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;
