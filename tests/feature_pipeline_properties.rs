//! Property-based tests for the detection, similarity and ranking invariants
//!
//! These tests verify that:
//! - Every alias resolves to its primary pattern id, regardless of case
//! - Empty text never produces a detection
//! - A record is always perfectly similar to itself
//! - Widely available features never get "better" alternatives
//! - Recommendation confidence stays within `[0, 1]`
//! - Ranking keeps one entry per feature, orders by type and respects the limit
//! - The compatibility score stays within `[0, 100]`

use std::sync::{Arc, OnceLock};

use featurescope_analysis::compatibility_score;
use featurescope_domain::{
    BaselineStatus, FeatureRecord, ProjectFeatureUsage, Recommendation, RecommendationType,
    ResolvedFeature,
};
use featurescope_knowledge::FeatureKnowledgeBase;
use featurescope_patterns::PatternRegistry;
use featurescope_recommend::rank_recommendations;
use featurescope_similarity::SimilarityEngine;
use proptest::prelude::*;

fn registry() -> &'static PatternRegistry {
    static REGISTRY: OnceLock<PatternRegistry> = OnceLock::new();
    REGISTRY.get_or_init(PatternRegistry::new)
}

fn bundled_features() -> &'static [Arc<FeatureRecord>] {
    static FEATURES: OnceLock<Vec<Arc<FeatureRecord>>> = OnceLock::new();
    FEATURES.get_or_init(|| {
        let knowledge = FeatureKnowledgeBase::bundled();
        tokio_test::block_on(knowledge.initialize());
        knowledge.all_features()
    })
}

fn baseline_strategy() -> impl Strategy<Value = BaselineStatus> {
    prop::sample::select(BaselineStatus::ALL.to_vec())
}

fn kind_strategy() -> impl Strategy<Value = RecommendationType> {
    prop::sample::select(vec![
        RecommendationType::Alternative,
        RecommendationType::Upgrade,
        RecommendationType::Complementary,
        RecommendationType::Contextual,
    ])
}

/// Strategy for recommendation pools drawn from a small id space so duplicates occur
fn pool_strategy() -> impl Strategy<Value = Vec<Recommendation>> {
    prop::collection::vec((0u8..6, baseline_strategy(), 0.0f64..=1.0, kind_strategy()), 0..24)
        .prop_map(|entries| {
            entries
                .into_iter()
                .map(|(id, baseline, confidence, kind)| {
                    let record = FeatureRecord::new(format!("feature-{id}"), "Feature", baseline);
                    Recommendation::new(Arc::new(record), "reason", confidence, kind)
                })
                .collect()
        })
}

proptest! {
    #[test]
    fn prop_aliases_resolve_to_primary(pattern in any::<prop::sample::Index>(), alias in any::<prop::sample::Index>()) {
        let patterns = registry().patterns();
        let pattern = pattern.get(patterns);
        prop_assume!(!pattern.aliases.is_empty());

        let aliases: Vec<&String> = pattern.aliases.iter().collect();
        let alias = alias.get(&aliases);
        prop_assert_eq!(registry().resolve_feature_id(alias), Some(pattern.id.as_str()));
        prop_assert_eq!(
            registry().resolve_feature_id(&alias.to_uppercase()),
            Some(pattern.id.as_str())
        );
    }

    #[test]
    fn prop_empty_text_detects_nothing(language in "[a-z]{0,12}") {
        prop_assert!(registry().detect_features("", Some(&language)).is_empty());
        prop_assert!(registry().detect_features("", None).is_empty());
    }

    #[test]
    fn prop_self_similarity_is_one(feature in any::<prop::sample::Index>()) {
        let record = feature.get(bundled_features());
        let result = SimilarityEngine::new().calculate_similarity(record, record);
        prop_assert_eq!(result.score, 1.0);
    }

    #[test]
    fn prop_widely_target_has_no_better_alternatives(feature in any::<prop::sample::Index>()) {
        let features = bundled_features();
        let target = feature.get(features);
        let alternatives = SimilarityEngine::new().find_better_alternatives(target, features, 10);
        if target.is_widely() {
            prop_assert!(alternatives.is_empty());
        }
        for alternative in &alternatives {
            prop_assert!(alternative.feature.is_widely());
            prop_assert_ne!(&alternative.feature.id, &target.id);
        }
    }

    #[test]
    fn prop_confidence_is_clamped(confidence in prop::num::f64::ANY) {
        let record = Arc::new(FeatureRecord::new("grid", "Grid", BaselineStatus::Widely));
        let recommendation =
            Recommendation::new(record, "reason", confidence, RecommendationType::Upgrade);
        prop_assert!((0.0..=1.0).contains(&recommendation.confidence));
    }

    #[test]
    fn prop_ranking_orders_by_type(pool in pool_strategy(), limit in 0usize..12) {
        let ranked = rank_recommendations(pool.clone(), limit);

        prop_assert!(ranked.len() <= limit);
        for pair in ranked.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            prop_assert!(a.kind.priority() <= b.kind.priority());
            if a.kind == b.kind {
                prop_assert!(a.confidence >= b.confidence);
            }
        }

        let mut ids: Vec<&str> = ranked.iter().map(|r| r.feature.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        prop_assert_eq!(ids.len(), ranked.len());

        for kept in &ranked {
            let best = pool
                .iter()
                .filter(|r| r.feature.id == kept.feature.id)
                .map(|r| r.confidence)
                .fold(0.0, f64::max);
            prop_assert_eq!(kept.confidence, best);
        }
    }

    #[test]
    fn prop_compatibility_score_bounded(
        usages in prop::collection::vec((baseline_strategy(), 1usize..50), 0..16)
    ) {
        let features: Vec<ProjectFeatureUsage> = usages
            .into_iter()
            .enumerate()
            .map(|(i, (baseline, count))| {
                let record = FeatureRecord::new(format!("feature-{i}"), "Feature", baseline);
                let mut usage = ProjectFeatureUsage::new(ResolvedFeature::Resolved(Arc::new(record)));
                usage.record_usage("a.css", count, Vec::new());
                usage
            })
            .collect();

        let score = compatibility_score(&features);
        prop_assert!((0.0..=100.0).contains(&score));
        if features.iter().all(|u| u.feature.baseline() == BaselineStatus::Widely) {
            prop_assert_eq!(score, 100.0);
        }
    }
}
