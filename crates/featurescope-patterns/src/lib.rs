#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! # FeatureScope Patterns
//!
//! Regular-expression detection rules for web-platform features, with the curated
//! relationships between them.
//!
//! ## Features
//!
//! - **Static catalog**: layout, selectors, custom values, visual effects, animation,
//!   scroll and interaction, cascade, markup, and JavaScript API patterns
//! - **Alias resolution**: many-to-one alternate keys onto each primary pattern id
//! - **Language scoping**: detection restricted to the patterns relevant to a document's
//!   language family
//! - **Relationships**: alternatives, upgrade targets, complements and superseded features
//!
//! Detection works on raw text. It cannot tell real usage from comments or strings;
//! that imprecision is accepted.

pub mod catalog;
pub mod error;
pub mod location;
pub mod models;
pub mod registry;

pub use catalog::{PatternSpec, BUILTIN_PATTERNS};
pub use error::{PatternError, PatternResult};
pub use location::LineIndex;
pub use models::{PatternCategory, PatternDefinition, PatternMatch, RiskLevel};
pub use registry::PatternRegistry;
