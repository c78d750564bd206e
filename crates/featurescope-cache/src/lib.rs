//! # FeatureScope Cache
//!
//! Key/value caching with a fixed time-to-live per entry.
//!
//! ## Features
//!
//! - **Read-time expiry**: every lookup compares the entry's expiry timestamp with the
//!   current instant, so a stale entry is never served even if no sweep has run
//! - **Explicit purge**: `purge_expired` drops every stale entry on demand
//! - **Optional sweeper**: a background tokio task that purges periodically
//! - **Metrics**: hit, miss, insertion and eviction counters

pub mod cache;
pub mod error;
pub mod metrics;

pub use cache::{CacheEntry, TtlCache};
pub use error::{CacheError, Result};
pub use metrics::{CacheMetrics, CacheStats};
