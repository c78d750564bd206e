//! Cache-related error types

use thiserror::Error;

/// Cache operation errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CacheError {
    #[error("Invalid time-to-live: {reason}")]
    InvalidTtl { reason: String },
}

/// Re-export commonly used Result type
pub type Result<T> = std::result::Result<T, CacheError>;
