#![forbid(unsafe_code)]

//! # FeatureScope Domain
//!
//! Shared data model for the FeatureScope compatibility pipeline.
//!
//! ## Contents
//!
//! - **Feature records**: immutable descriptions of web-platform features and their
//!   baseline tier
//! - **Usage records**: per-analysis aggregation of where a feature was found
//! - **Recommendations**: ranked suggestions with a bounded confidence
//! - **Configuration**: host-supplied engine settings, injected into every component
//! - **Resolution**: the ordered id lookup chain shared by analysis and recommendations

pub mod config;
pub mod error;
pub mod language;
pub mod models;
pub mod resolve;

pub use config::{DiagnosticSeverity, EngineConfig, RiskTolerance, DEFAULT_CACHE_TTL};
pub use error::{ConfigError, Result};
pub use language::LanguageFamily;
pub use models::*;
pub use resolve::ResolutionChain;
