//! # FeatureScope Knowledge
//!
//! In-memory knowledge base of web-platform features and their baseline status.
//!
//! ## Features
//!
//! - **Pluggable sources**: load from the bundled dataset, any JSON document, or
//!   records the host already holds
//! - **One-time async load**: initialization runs once; a failed load leaves an
//!   empty but ready base instead of an error
//! - **Bounded readiness wait**: callers poll with a timeout rather than hang
//! - **Indexed queries**: by id, name, baseline tier, category, browser version
//!   and keyword tag

pub mod error;
pub mod index;
pub mod knowledge_base;
pub mod source;

pub use error::{KnowledgeError, Result};
pub use index::FeatureIndex;
pub use knowledge_base::{FeatureKnowledgeBase, MAX_SIMILAR_FEATURES};
pub use source::{
    FeatureDataSource, JsonFeatureSource, OneOrMany, RawBaseline, RawDataset, RawFeature,
    RawStatus, StaticFeatureSource, TAG_KEYWORDS,
};
