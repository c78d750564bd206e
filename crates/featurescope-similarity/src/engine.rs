//! Composite similarity scoring and the specialized candidate queries

use std::sync::Arc;

use featurescope_domain::{BaselineStatus, FeatureRecord};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{metrics, weights::SimilarityWeights};

/// Minimum composite score kept by [`SimilarityEngine::find_better_alternatives`]
pub const ALTERNATIVE_THRESHOLD: f64 = 0.4;
/// Minimum composite score kept by [`SimilarityEngine::find_upgrade_paths`]
pub const UPGRADE_THRESHOLD: f64 = 0.6;
/// Minimum composite score kept by [`SimilarityEngine::find_complementary`]
pub const COMPLEMENTARY_THRESHOLD: f64 = 0.4;

/// Individual sub-metric values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarityBreakdown {
    pub name: f64,
    pub description: f64,
    pub category: f64,
    pub browser_support: f64,
    pub baseline: f64,
    pub temporal: f64,
}

impl SimilarityBreakdown {
    /// Every sub-metric saturated
    pub const IDENTICAL: SimilarityBreakdown = SimilarityBreakdown {
        name: 1.0,
        description: 1.0,
        category: 1.0,
        browser_support: 1.0,
        baseline: 1.0,
        temporal: 1.0,
    };

    /// Compute every sub-metric for a pair of records
    pub fn between(a: &FeatureRecord, b: &FeatureRecord) -> Self {
        if a == b {
            return Self::IDENTICAL;
        }
        Self {
            name: metrics::name_similarity(a, b),
            description: metrics::description_similarity(a, b),
            category: metrics::category_similarity(a, b),
            browser_support: metrics::browser_support_similarity(a, b),
            baseline: metrics::baseline_similarity(a, b),
            temporal: metrics::temporal_similarity(a, b),
        }
    }

    /// Weighted average of the sub-metrics, 0 when every weight is zero
    pub fn composite(&self, weights: &SimilarityWeights) -> f64 {
        let total = weights.total();
        if total <= 0.0 || !total.is_finite() {
            return 0.0;
        }
        let weighted = self.name * weights.name
            + self.description * weights.description
            + self.category * weights.category
            + self.browser_support * weights.browser_support
            + self.baseline * weights.baseline
            + self.temporal * weights.temporal;
        (weighted / total).clamp(0.0, 1.0)
    }

    /// Short explanations for the sub-metrics that scored high
    pub fn reasons(&self, a: &FeatureRecord) -> Vec<String> {
        let mut reasons = Vec::new();
        if self.name > 0.7 {
            reasons.push("Similar name".to_string());
        }
        if self.category > 0.7 {
            reasons.push("Same category".to_string());
        }
        if self.browser_support > 0.7 {
            reasons.push("Similar browser support".to_string());
        }
        if self.baseline == 1.0 {
            reasons.push(format!("Same baseline status ({})", a.baseline));
        }
        if self.description > 0.5 {
            reasons.push("Similar description".to_string());
        }
        if self.temporal > 0.7 {
            reasons.push("Became baseline around the same time".to_string());
        }
        reasons
    }
}

/// Composite score between two records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResult {
    /// Weighted composite in `[0, 1]`
    pub score: f64,
    /// Sub-metric values
    pub breakdown: SimilarityBreakdown,
    /// Explanations for high sub-metrics
    pub reasons: Vec<String>,
}

/// A candidate record with its score against a target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarFeature {
    pub feature: Arc<FeatureRecord>,
    pub similarity: SimilarityResult,
}

impl SimilarFeature {
    /// Composite score
    pub fn score(&self) -> f64 {
        self.similarity.score
    }
}

/// Stateless multi-metric scorer
#[derive(Debug, Clone, Default)]
pub struct SimilarityEngine {
    weights: SimilarityWeights,
}

impl SimilarityEngine {
    /// Engine using the default weights
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine using caller-supplied weights for [`Self::calculate_similarity`]
    pub fn with_weights(weights: SimilarityWeights) -> Self {
        Self { weights }
    }

    /// Weights used by [`Self::calculate_similarity`]
    pub fn weights(&self) -> &SimilarityWeights {
        &self.weights
    }

    /// Score two records with the engine's weights
    pub fn calculate_similarity(&self, a: &FeatureRecord, b: &FeatureRecord) -> SimilarityResult {
        Self::score_with(a, b, &self.weights)
    }

    /// Score two records with explicit weights
    pub fn score_with(
        a: &FeatureRecord,
        b: &FeatureRecord,
        weights: &SimilarityWeights,
    ) -> SimilarityResult {
        let breakdown = SimilarityBreakdown::between(a, b);
        SimilarityResult {
            score: breakdown.composite(weights),
            reasons: breakdown.reasons(a),
            breakdown,
        }
    }

    /// Widely available replacements for a feature that is not.
    ///
    /// Returns nothing when the target is already widely available.
    pub fn find_better_alternatives(
        &self,
        target: &FeatureRecord,
        candidates: &[Arc<FeatureRecord>],
        max_results: usize,
    ) -> Vec<SimilarFeature> {
        if target.baseline == BaselineStatus::Widely {
            return Vec::new();
        }
        let results = rank(
            target,
            candidates,
            |candidate| candidate.is_widely(),
            &SimilarityWeights::alternatives(),
            ALTERNATIVE_THRESHOLD,
            max_results,
        );
        debug!(
            "Found {} better alternatives for '{}'",
            results.len(),
            target.id
        );
        results
    }

    /// Features that became baseline after the target and look like its successors.
    ///
    /// Requires the target to have a newly-available date.
    pub fn find_upgrade_paths(
        &self,
        target: &FeatureRecord,
        candidates: &[Arc<FeatureRecord>],
        max_results: usize,
    ) -> Vec<SimilarFeature> {
        let Some(target_date) = target.baseline_low_date else {
            return Vec::new();
        };
        let results = rank(
            target,
            candidates,
            |candidate| {
                candidate
                    .baseline_low_date
                    .is_some_and(|date| date > target_date)
            },
            &SimilarityWeights::upgrades(),
            UPGRADE_THRESHOLD,
            max_results,
        );
        debug!("Found {} upgrade paths for '{}'", results.len(), target.id);
        results
    }

    /// Widely available features that tend to be used alongside the target
    pub fn find_complementary(
        &self,
        target: &FeatureRecord,
        candidates: &[Arc<FeatureRecord>],
        max_results: usize,
    ) -> Vec<SimilarFeature> {
        let results = rank(
            target,
            candidates,
            |candidate| candidate.is_widely(),
            &SimilarityWeights::complementary(),
            COMPLEMENTARY_THRESHOLD,
            max_results,
        );
        debug!(
            "Found {} complementary features for '{}'",
            results.len(),
            target.id
        );
        results
    }
}

fn rank<F>(
    target: &FeatureRecord,
    candidates: &[Arc<FeatureRecord>],
    eligible: F,
    weights: &SimilarityWeights,
    threshold: f64,
    max_results: usize,
) -> Vec<SimilarFeature>
where
    F: Fn(&FeatureRecord) -> bool,
{
    let mut scored: Vec<SimilarFeature> = candidates
        .iter()
        .filter(|candidate| candidate.id != target.id && eligible(candidate))
        .map(|candidate| SimilarFeature {
            similarity: SimilarityEngine::score_with(target, candidate, weights),
            feature: Arc::clone(candidate),
        })
        .filter(|scored| scored.score() >= threshold)
        .collect();

    scored.sort_by(|a, b| {
        b.score()
            .total_cmp(&a.score())
            .then_with(|| a.feature.id.cmp(&b.feature.id))
    });
    scored.truncate(max_results);
    scored
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn record(
        id: &str,
        name: &str,
        baseline: BaselineStatus,
        category: &str,
    ) -> Arc<FeatureRecord> {
        let mut record = FeatureRecord::new(id, name, baseline);
        record.category = Some(category.to_string());
        Arc::new(record)
    }

    fn selectors() -> Vec<Arc<FeatureRecord>> {
        vec![
            record("has", ":has()", BaselineStatus::Limited, "selectors"),
            record("css-is", ":is()", BaselineStatus::Widely, "selectors"),
            record("css-where", ":where()", BaselineStatus::Widely, "selectors"),
            record("grid", "Grid", BaselineStatus::Widely, "layout"),
            record("nesting", "Nesting", BaselineStatus::Newly, "selectors"),
        ]
    }

    #[test]
    fn test_self_similarity_is_one() {
        let engine = SimilarityEngine::new();
        for feature in selectors() {
            let result = engine.calculate_similarity(&feature, &feature);
            assert_eq!(result.score, 1.0);
            assert_eq!(result.breakdown, SimilarityBreakdown::IDENTICAL);
        }
    }

    #[test]
    fn test_custom_weights_are_normalized() {
        let weights = SimilarityWeights {
            name: 2.0,
            description: 0.0,
            category: 2.0,
            browser_support: 0.0,
            baseline: 0.0,
            temporal: 0.0,
        };
        let engine = SimilarityEngine::with_weights(weights);
        let features = selectors();

        // Same category, different names
        let score = engine.calculate_similarity(&features[1], &features[2]).score;
        assert!(score > 0.5 && score <= 1.0);

        let zero = SimilarityWeights {
            name: 0.0,
            description: 0.0,
            category: 0.0,
            browser_support: 0.0,
            baseline: 0.0,
            temporal: 0.0,
        };
        assert_eq!(
            SimilarityEngine::score_with(&features[1], &features[2], &zero).score,
            0.0
        );
    }

    #[test]
    fn test_reasons_follow_thresholds() {
        let features = selectors();
        let result = SimilarityEngine::new().calculate_similarity(&features[1], &features[2]);

        assert!(result.reasons.contains(&"Same category".to_string()));
        assert!(result
            .reasons
            .contains(&"Same baseline status (widely)".to_string()));
        assert!(!result.reasons.contains(&"Similar description".to_string()));
    }

    #[test]
    fn test_better_alternatives_for_limited_feature() {
        let engine = SimilarityEngine::new();
        let features = selectors();
        let results = engine.find_better_alternatives(&features[0], &features, 5);

        assert!(!results.is_empty());
        assert!(results.iter().all(|r| r.feature.is_widely()));
        assert!(results.iter().all(|r| r.feature.id != "has"));
        assert!(results.iter().all(|r| r.score() >= ALTERNATIVE_THRESHOLD));
        assert!(results.windows(2).all(|w| w[0].score() >= w[1].score()));
        assert_eq!(results[0].feature.category.as_deref(), Some("selectors"));
    }

    #[test]
    fn test_no_alternatives_for_widely_feature() {
        let engine = SimilarityEngine::new();
        let features = selectors();
        assert!(engine
            .find_better_alternatives(&features[1], &features, 5)
            .is_empty());
    }

    #[test]
    fn test_max_results_truncates() {
        let engine = SimilarityEngine::new();
        let features = selectors();
        assert_eq!(engine.find_better_alternatives(&features[0], &features, 1).len(), 1);
        assert!(engine
            .find_better_alternatives(&features[0], &features, 0)
            .is_empty());
    }

    #[test]
    fn test_upgrade_paths_need_later_date() {
        let engine = SimilarityEngine::new();
        let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d);

        let mut grid = FeatureRecord::new("grid", "Grid", BaselineStatus::Widely);
        grid.category = Some("layout".to_string());
        grid.description = "Two-dimensional grid layout".to_string();
        grid.baseline_low_date = date(2017, 10, 17);

        let mut subgrid = FeatureRecord::new("subgrid", "Subgrid", BaselineStatus::Newly);
        subgrid.category = Some("layout".to_string());
        subgrid.description = "Nested two-dimensional grid layout".to_string();
        subgrid.baseline_low_date = date(2023, 9, 15);

        let mut old = FeatureRecord::new("grid-legacy", "Grid legacy", BaselineStatus::Widely);
        old.category = Some("layout".to_string());
        old.baseline_low_date = date(2015, 1, 1);

        let candidates = vec![Arc::new(subgrid), Arc::new(old)];
        let results = engine.find_upgrade_paths(&grid, &candidates, 5);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].feature.id, "subgrid");

        grid.baseline_low_date = None;
        assert!(engine.find_upgrade_paths(&grid, &candidates, 5).is_empty());
    }

    #[test]
    fn test_complementary_only_widely() {
        let engine = SimilarityEngine::new();
        let features = selectors();
        let results = engine.find_complementary(&features[4], &features, 10);

        assert!(results.iter().all(|r| r.feature.is_widely()));
        assert!(results.iter().any(|r| r.feature.id == "css-is"));
        assert!(results.iter().all(|r| r.feature.id != "grid"));
    }
}
