//! # FeatureScope Analysis
//!
//! Project-wide scanning of source documents for web-platform feature usage.
//!
//! ## Features
//!
//! - **Provider seam**: documents arrive through a [`DocumentProvider`]; the analyzer
//!   never reads the filesystem
//! - **Resolution with fallback**: every detected pattern yields a record, either
//!   from the knowledge base or a synthesized placeholder
//! - **Compatibility score**: usage-weighted average of per-feature baseline scores
//! - **Suggestions**: overall verdict, top risks with alternatives, modernization
//!   hints and coverage
//! - **Fault isolation**: a failing document is logged and skipped, never aborting
//!   the batch
//! - **Caching**: whole-project results cached per workspace-root set

pub mod analyzer;
pub mod document;
pub mod error;
pub mod models;
pub mod scoring;
pub mod suggestions;

pub use analyzer::ProjectAnalyzer;
pub use document::{Document, DocumentProvider, InMemoryDocuments, WorkspaceScope};
pub use error::{AnalysisError, Result};
pub use models::{AnalysisProgress, ProgressCallback, ProjectAnalysis};
pub use scoring::{compatibility_score, partition_by_risk, NO_FEATURES_SCORE};
pub use suggestions::{tier_message, MAX_RISK_SUGGESTIONS};
