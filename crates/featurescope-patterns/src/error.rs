//! Error types for pattern compilation

use thiserror::Error;

/// Result type for pattern operations
pub type PatternResult<T> = Result<T, PatternError>;

/// Errors that can occur while building the pattern registry
#[derive(Debug, Error)]
pub enum PatternError {
    /// A detection expression failed to compile
    #[error("Invalid regex for pattern '{pattern}': {source}")]
    InvalidRegex {
        /// Pattern id the expression belongs to
        pattern: String,
        /// Underlying compile error
        #[source]
        source: regex::Error,
    },

    /// An alias is claimed by two different primary ids
    #[error("Alias '{alias}' of '{pattern}' already resolves to '{existing}'")]
    AliasConflict {
        /// The conflicting alias
        alias: String,
        /// Pattern that tried to claim it
        pattern: String,
        /// Pattern that already owns it
        existing: String,
    },
}
