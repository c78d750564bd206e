//! Analysis results and progress events

use std::{collections::BTreeMap, sync::Arc};

use chrono::{DateTime, Utc};
use featurescope_domain::ProjectFeatureUsage;
use serde::{Deserialize, Serialize};

/// Outcome of one analysis pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectAnalysis {
    /// Usage per resolved feature id
    pub features: BTreeMap<String, ProjectFeatureUsage>,
    /// Number of distinct features detected
    pub total_features: usize,
    /// Sum of all match counts
    pub total_usages: usize,
    /// Usage-weighted average of per-feature risk scores, 0 to 100
    pub compatibility_score: f64,
    /// Features that are not widely available, most used first
    pub risk_features: Vec<ProjectFeatureUsage>,
    /// Widely available features, most used first
    pub safe_features: Vec<ProjectFeatureUsage>,
    /// Human-readable advice
    pub suggestions: Vec<String>,
    /// Documents processed successfully
    pub analyzed_files: usize,
    /// Documents that failed and were skipped
    pub skipped_files: usize,
    /// Documents in scope
    pub total_files: usize,
    /// When the analysis finished
    pub timestamp: DateTime<Utc>,
}

impl ProjectAnalysis {
    /// Share of in-scope files that were analyzed, as a percentage
    pub fn coverage(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            self.analyzed_files as f64 / self.total_files as f64 * 100.0
        }
    }
}

/// Reported after every document, processed or skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisProgress {
    /// Documents handled so far
    pub processed: usize,
    /// Documents in the batch
    pub total: usize,
    /// Document just handled
    pub file: String,
}

/// Callback receiving progress events
pub type ProgressCallback = Arc<dyn Fn(AnalysisProgress) + Send + Sync>;
