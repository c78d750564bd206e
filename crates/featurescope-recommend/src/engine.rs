//! Five-stage recommendation pipeline

use std::{collections::HashSet, sync::Arc};

use featurescope_cache::{CacheStats, TtlCache};
use featurescope_domain::{
    EngineConfig, FeatureRecord, LanguageFamily, Recommendation, RecommendationType,
    ResolutionChain,
};
use featurescope_knowledge::FeatureKnowledgeBase;
use featurescope_patterns::{PatternDefinition, PatternRegistry};
use featurescope_similarity::SimilarityEngine;
use tracing::{debug, warn};

use crate::{context::RecommendationContext, error::Result, ranking::rank_recommendations};

/// Confidence of a curated alternative
pub const CURATED_ALTERNATIVE_CONFIDENCE: f64 = 0.95;
/// Ceiling for algorithmic alternatives
pub const ALGORITHMIC_ALTERNATIVE_CAP: f64 = 0.85;
/// Confidence of a curated upgrade target
pub const CURATED_UPGRADE_CONFIDENCE: f64 = 0.9;
/// Ceiling for algorithmic upgrades
pub const ALGORITHMIC_UPGRADE_CAP: f64 = 0.8;
/// Confidence of a curated complement
pub const CURATED_COMPLEMENTARY_CONFIDENCE: f64 = 0.85;
/// Ceiling for algorithmic complements
pub const ALGORITHMIC_COMPLEMENTARY_CAP: f64 = 0.75;
/// Confidence of a contextual suggestion
pub const CONTEXTUAL_CONFIDENCE: f64 = 0.6;

/// Curated complements considered per feature
const MAX_CURATED_COMPLEMENTS: usize = 3;
/// Contextual suggestions per request
const MAX_CONTEXTUAL: usize = 2;

/// Well-known modern stylesheet features
const CSS_CONTEXTUAL: &[&str] = &[
    "container-queries",
    "cascade-layers",
    "nesting",
    "custom-properties",
];

/// Well-known modern script features
const JS_CONTEXTUAL: &[&str] = &[
    "optional-chaining",
    "nullish-coalescing",
    "structured-clone",
    "array-at",
];

/// Turns a feature id into ranked, cached recommendations
pub struct RecommendationEngine {
    registry: Arc<PatternRegistry>,
    knowledge: Arc<FeatureKnowledgeBase>,
    similarity: SimilarityEngine,
    config: Arc<EngineConfig>,
    cache: TtlCache<RecommendationContext, Vec<Recommendation>>,
}

/// Candidate pool shared by the stages
struct Pool<'a> {
    current: &'a FeatureRecord,
    recommendations: Vec<Recommendation>,
}

impl Pool<'_> {
    fn push(
        &mut self,
        feature: Arc<FeatureRecord>,
        reason: String,
        confidence: f64,
        kind: RecommendationType,
    ) {
        if feature.id == self.current.id {
            return;
        }
        self.recommendations
            .push(Recommendation::new(feature, reason, confidence, kind));
    }

    fn len(&self) -> usize {
        self.recommendations.len()
    }
}

impl RecommendationEngine {
    /// Create an engine sharing the given registry, knowledge base and config
    pub fn new(
        registry: Arc<PatternRegistry>,
        knowledge: Arc<FeatureKnowledgeBase>,
        config: Arc<EngineConfig>,
    ) -> Result<Self> {
        let cache = TtlCache::new(config.effective_cache_ttl())?;
        Ok(Self {
            registry,
            knowledge,
            similarity: SimilarityEngine::new(),
            config,
            cache,
        })
    }

    /// Ranked recommendations for the feature in `context`.
    ///
    /// Never fails: a knowledge base that is not ready in time or an unknown
    /// feature yields an empty list, which is not cached.
    pub async fn get_recommendations(&self, context: &RecommendationContext) -> Vec<Recommendation> {
        if let Some(cached) = self.cache.get(context).await {
            debug!("Using cached recommendations for '{}'", context.current_feature);
            return cached;
        }

        if let Err(e) = self
            .knowledge
            .wait_for_ready(self.config.readiness_timeout)
            .await
        {
            warn!("No recommendations for '{}': {}", context.current_feature, e);
            return Vec::new();
        }

        let Some(current) = self.resolve_current(&context.current_feature) else {
            debug!("Unknown feature '{}'", context.current_feature);
            return Vec::new();
        };
        let pattern = self
            .registry
            .get_pattern(&context.current_feature)
            .or_else(|| self.registry.get_pattern(&current.id));

        let recommendations = self.run_pipeline(&current, pattern, context);
        self.cache
            .insert(context.clone(), recommendations.clone())
            .await;
        recommendations
    }

    /// Drop every cached recommendation list
    pub async fn invalidate_cache(&self) {
        self.cache.clear().await;
        debug!("Recommendation cache invalidated");
    }

    /// Recommendation cache counters
    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }

    fn run_pipeline(
        &self,
        current: &FeatureRecord,
        pattern: Option<&PatternDefinition>,
        context: &RecommendationContext,
    ) -> Vec<Recommendation> {
        let limit = self.config.recommendation_limit();
        let candidates = self.knowledge.all_features();
        let mut pool = Pool {
            current,
            recommendations: Vec::new(),
        };

        self.curated_alternatives(&mut pool, pattern);
        let after_curated = pool.len();
        self.algorithmic_alternatives(&mut pool, &candidates, limit);
        let after_alternatives = pool.len();
        self.upgrades(&mut pool, pattern, &candidates, limit);
        let after_upgrades = pool.len();
        self.complements(&mut pool, pattern, &candidates, limit);
        let after_complements = pool.len();
        self.contextual(&mut pool, &context.document_language);

        debug!(
            "Recommendation stages for '{}': {} curated, {} algorithmic, {} upgrades, {} complements, {} contextual",
            current.id,
            after_curated,
            after_alternatives - after_curated,
            after_upgrades - after_alternatives,
            after_complements - after_upgrades,
            pool.len() - after_complements
        );

        rank_recommendations(pool.recommendations, limit)
    }

    /// Stage 1: widely available alternatives listed by the pattern
    fn curated_alternatives(&self, pool: &mut Pool<'_>, pattern: Option<&PatternDefinition>) {
        let Some(pattern) = pattern else {
            return;
        };
        for alternative in &pattern.alternatives {
            let Some(record) = self.resolve_reference(alternative) else {
                continue;
            };
            if !record.is_widely() {
                continue;
            }
            let reason = format!(
                "{} is widely supported and can replace {}",
                record.name, pool.current.name
            );
            pool.push(
                record,
                reason,
                CURATED_ALTERNATIVE_CONFIDENCE,
                RecommendationType::Alternative,
            );
        }
    }

    /// Stage 2: similar widely available features, only for limited or unknown support
    fn algorithmic_alternatives(
        &self,
        pool: &mut Pool<'_>,
        candidates: &[Arc<FeatureRecord>],
        limit: usize,
    ) {
        if !pool.current.baseline.is_limited_or_unknown() {
            return;
        }
        for found in self
            .similarity
            .find_better_alternatives(pool.current, candidates, limit)
        {
            let reason = explain(
                &format!("Widely supported alternative to {}", pool.current.name),
                &found.similarity.reasons,
            );
            pool.push(
                found.feature,
                reason,
                found.similarity.score.min(ALGORITHMIC_ALTERNATIVE_CAP),
                RecommendationType::Alternative,
            );
        }
    }

    /// Stage 3: the curated upgrade target, then algorithmic successors
    fn upgrades(
        &self,
        pool: &mut Pool<'_>,
        pattern: Option<&PatternDefinition>,
        candidates: &[Arc<FeatureRecord>],
        limit: usize,
    ) {
        let mut curated = HashSet::new();
        if let Some(target) = pattern
            .and_then(|p| p.upgrade_to.as_deref())
            .and_then(|id| self.resolve_reference(id))
        {
            curated.insert(target.id.clone());
            let reason = format!(
                "{} is the modern successor to {}",
                target.name, pool.current.name
            );
            pool.push(
                target,
                reason,
                CURATED_UPGRADE_CONFIDENCE,
                RecommendationType::Upgrade,
            );
        }

        for found in self
            .similarity
            .find_upgrade_paths(pool.current, candidates, limit)
        {
            if curated.contains(&found.feature.id) {
                continue;
            }
            let reason = explain(
                &format!("Newer feature related to {}", pool.current.name),
                &found.similarity.reasons,
            );
            pool.push(
                found.feature,
                reason,
                found.similarity.score.min(ALGORITHMIC_UPGRADE_CAP),
                RecommendationType::Upgrade,
            );
        }
    }

    /// Stage 4: curated complements (top 3), then algorithmic ones
    fn complements(
        &self,
        pool: &mut Pool<'_>,
        pattern: Option<&PatternDefinition>,
        candidates: &[Arc<FeatureRecord>],
        limit: usize,
    ) {
        let mut curated = HashSet::new();
        let listed = pattern.map(|p| p.complementary.as_slice()).unwrap_or_default();
        for record in listed
            .iter()
            .filter_map(|id| self.resolve_reference(id))
            .take(MAX_CURATED_COMPLEMENTS)
        {
            curated.insert(record.id.clone());
            let reason = format!(
                "{} is commonly used with {}",
                record.name, pool.current.name
            );
            pool.push(
                record,
                reason,
                CURATED_COMPLEMENTARY_CONFIDENCE,
                RecommendationType::Complementary,
            );
        }

        for found in self
            .similarity
            .find_complementary(pool.current, candidates, limit)
        {
            if curated.contains(&found.feature.id) {
                continue;
            }
            let reason = explain(
                &format!("Works well alongside {}", pool.current.name),
                &found.similarity.reasons,
            );
            pool.push(
                found.feature,
                reason,
                found.similarity.score.min(ALGORITHMIC_COMPLEMENTARY_CAP),
                RecommendationType::Complementary,
            );
        }
    }

    /// Stage 5: well-known modern features for the document's language family
    fn contextual(&self, pool: &mut Pool<'_>, document_language: &str) {
        let suggestions = match LanguageFamily::from_language_id(document_language) {
            LanguageFamily::Css => CSS_CONTEXTUAL,
            LanguageFamily::Js => JS_CONTEXTUAL,
            LanguageFamily::Html | LanguageFamily::Other => return,
        };

        let current_id = pool.current.id.clone();
        let records: Vec<Arc<FeatureRecord>> = suggestions
            .iter()
            .filter_map(|id| self.resolve_reference(id))
            .filter(|record| record.id != current_id)
            .take(MAX_CONTEXTUAL)
            .collect();
        for record in records {
            let reason = format!(
                "{} is a modern feature worth knowing in {}",
                record.name, document_language
            );
            pool.push(
                record,
                reason,
                CONTEXTUAL_CONFIDENCE,
                RecommendationType::Contextual,
            );
        }
    }

    /// The record for a requested id: a dataset key, or a pattern id or alias
    fn resolve_current(&self, id: &str) -> Option<Arc<FeatureRecord>> {
        self.knowledge
            .get_feature(id)
            .or_else(|| self.resolve_reference(id))
    }

    /// Resolve a pattern id (or plain feature id) through the lookup chain
    fn resolve_reference(&self, id: &str) -> Option<Arc<FeatureRecord>> {
        let chain = match self.registry.get_pattern(id) {
            Some(pattern) => {
                ResolutionChain::new(&pattern.id, pattern.aliases.iter().map(String::as_str))
            }
            None => ResolutionChain::new(id, std::iter::empty()),
        };
        chain.resolve(|key| self.knowledge.get_feature(key))
    }
}

fn explain(summary: &str, reasons: &[String]) -> String {
    if reasons.is_empty() {
        summary.to_string()
    } else {
        format!("{summary} ({})", reasons.join(", ").to_lowercase())
    }
}
