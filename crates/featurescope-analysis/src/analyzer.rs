//! Project-wide feature usage analysis

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use chrono::Utc;
use featurescope_cache::{CacheStats, TtlCache};
use featurescope_domain::{
    EngineConfig, FeatureRecord, ProjectFeatureUsage, ResolutionChain, ResolvedFeature,
    UsageLocation,
};
use featurescope_knowledge::FeatureKnowledgeBase;
use featurescope_patterns::{LineIndex, PatternDefinition, PatternRegistry};
use tracing::{debug, info, warn};

use crate::{
    document::{Document, DocumentProvider, WorkspaceScope},
    error::{AnalysisError, Result},
    models::{AnalysisProgress, ProgressCallback, ProjectAnalysis},
    scoring::{compatibility_score, partition_by_risk},
    suggestions::{SuggestionContext, SuggestionInput},
};

/// Scans documents for feature usage and scores project compatibility.
///
/// Whole-project results are cached per workspace-root set for the configured TTL.
pub struct ProjectAnalyzer {
    registry: Arc<PatternRegistry>,
    knowledge: Arc<FeatureKnowledgeBase>,
    config: Arc<EngineConfig>,
    cache: TtlCache<String, Arc<ProjectAnalysis>>,
    progress: Option<ProgressCallback>,
}

impl ProjectAnalyzer {
    /// Create an analyzer sharing the given registry, knowledge base and config
    pub fn new(
        registry: Arc<PatternRegistry>,
        knowledge: Arc<FeatureKnowledgeBase>,
        config: Arc<EngineConfig>,
    ) -> Result<Self> {
        let cache = TtlCache::new(config.effective_cache_ttl())?;
        Ok(Self {
            registry,
            knowledge,
            config,
            cache,
            progress: None,
        })
    }

    /// Report progress after every document
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    /// Analyze every file in `scope`, reading them through `provider`.
    ///
    /// A cached result for the same root set is returned unchanged while it is
    /// live. Failed analyses are never cached.
    pub async fn analyze_project(
        &self,
        scope: &WorkspaceScope,
        provider: &dyn DocumentProvider,
    ) -> Result<Arc<ProjectAnalysis>> {
        let key = scope.cache_key();
        if let Some(cached) = self.cache.get(&key).await {
            debug!("Using cached analysis for roots '{}'", key);
            return Ok(cached);
        }

        self.knowledge
            .wait_for_ready(self.config.readiness_timeout)
            .await?;

        let mut scan = Scan::new(self, scope.files.len());
        for file in &scope.files {
            let outcome = match provider.open(file).await {
                Ok(document) => scan.ingest(&document),
                Err(e) => Err(e),
            };
            if let Err(e) = outcome {
                scan.skip(file, &e);
            }
            scan.advance(file);
            tokio::task::yield_now().await;
        }

        let analysis = Arc::new(scan.finish());
        self.cache.insert(key, Arc::clone(&analysis)).await;
        Ok(analysis)
    }

    /// Analyze documents already in memory, bypassing the cache
    pub async fn analyze_documents(&self, documents: &[Document]) -> Result<ProjectAnalysis> {
        self.knowledge
            .wait_for_ready(self.config.readiness_timeout)
            .await?;

        let mut scan = Scan::new(self, documents.len());
        for document in documents {
            if let Err(e) = scan.ingest(document) {
                scan.skip(&document.file_name, &e);
            }
            scan.advance(&document.file_name);
            tokio::task::yield_now().await;
        }
        Ok(scan.finish())
    }

    /// Drop every cached analysis
    pub async fn invalidate_cache(&self) {
        self.cache.clear().await;
        debug!("Analysis cache invalidated");
    }

    /// Analysis cache counters
    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }
}

/// Accumulator for one analysis pass
struct Scan<'a> {
    analyzer: &'a ProjectAnalyzer,
    total: usize,
    processed: usize,
    analyzed: usize,
    skipped: usize,
    features: BTreeMap<String, ProjectFeatureUsage>,
    /// Resolved feature id to the pattern that first detected it
    detected: BTreeMap<String, String>,
    /// Pattern id to its resolution, so placeholders are built once per pass
    resolutions: HashMap<String, ResolvedFeature>,
}

impl<'a> Scan<'a> {
    fn new(analyzer: &'a ProjectAnalyzer, total: usize) -> Self {
        Self {
            analyzer,
            total,
            processed: 0,
            analyzed: 0,
            skipped: 0,
            features: BTreeMap::new(),
            detected: BTreeMap::new(),
            resolutions: HashMap::new(),
        }
    }

    fn ingest(&mut self, document: &Document) -> Result<()> {
        if document.text.contains('\0') {
            return Err(AnalysisError::document(
                &document.file_name,
                "binary content",
            ));
        }

        let analyzer = self.analyzer;
        let registry: &'a PatternRegistry = &analyzer.registry;
        let counts = registry.detect_features(&document.text, document.language());
        if !counts.is_empty() {
            let line_index = LineIndex::new(&document.text);
            for (pattern_id, count) in counts {
                let Some(pattern) = registry.get_pattern(&pattern_id) else {
                    continue;
                };
                let feature = self.resolve(pattern);
                let locations: Vec<UsageLocation> = registry
                    .locate_indexed(&pattern.id, &document.text, &line_index)
                    .into_iter()
                    .map(|m| UsageLocation {
                        file: document.file_name.clone(),
                        line: m.line,
                        column: m.column,
                        matched_text: m.text,
                    })
                    .collect();

                let feature_id = feature.id().to_string();
                self.detected
                    .entry(feature_id.clone())
                    .or_insert_with(|| pattern.id.clone());
                self.features
                    .entry(feature_id)
                    .or_insert_with(|| ProjectFeatureUsage::new(feature))
                    .record_usage(&document.file_name, count, locations);
            }
        }

        self.analyzed += 1;
        Ok(())
    }

    /// Resolve a pattern through the id chain, synthesizing a placeholder on a miss
    fn resolve(&mut self, pattern: &PatternDefinition) -> ResolvedFeature {
        if let Some(resolved) = self.resolutions.get(&pattern.id) {
            return resolved.clone();
        }

        let knowledge = &self.analyzer.knowledge;
        let chain = ResolutionChain::new(&pattern.id, pattern.aliases.iter().map(String::as_str));
        let resolved = match chain.resolve(|key| knowledge.get_feature(key)) {
            Some(record) => ResolvedFeature::Resolved(record),
            None => {
                debug!(
                    "No dataset entry for pattern '{}', synthesizing a {} placeholder",
                    pattern.id,
                    pattern.risk_level.implied_baseline()
                );
                ResolvedFeature::Synthesized(Arc::new(synthesize(pattern)))
            }
        };

        self.resolutions.insert(pattern.id.clone(), resolved.clone());
        resolved
    }

    fn skip(&mut self, file: &str, error: &AnalysisError) {
        warn!("Skipping {}: {}", file, error);
        self.skipped += 1;
    }

    fn advance(&mut self, file: &str) {
        self.processed += 1;
        if let Some(callback) = &self.analyzer.progress {
            callback(AnalysisProgress {
                processed: self.processed,
                total: self.total,
                file: file.to_string(),
            });
        }
    }

    fn finish(self) -> ProjectAnalysis {
        let compatibility_score = compatibility_score(self.features.values());
        let (risk_features, safe_features) = partition_by_risk(self.features.values());

        let context = SuggestionContext {
            registry: &self.analyzer.registry,
            knowledge: &self.analyzer.knowledge,
            target_browsers: &self.analyzer.config.target_browsers,
        };
        let suggestions = context.build(&SuggestionInput {
            compatibility_score,
            risk_features: &risk_features,
            safe_count: safe_features.len(),
            detected: &self.detected,
            analyzed_files: self.analyzed,
            total_files: self.total,
        });

        info!(
            "Analyzed {}/{} files: {} features, score {:.1}, {} at risk",
            self.analyzed,
            self.total,
            self.features.len(),
            compatibility_score,
            risk_features.len()
        );

        ProjectAnalysis {
            total_features: self.features.len(),
            total_usages: self.features.values().map(|u| u.usage_count).sum(),
            features: self.features,
            compatibility_score,
            risk_features,
            safe_features,
            suggestions,
            analyzed_files: self.analyzed,
            skipped_files: self.skipped,
            total_files: self.total,
            timestamp: Utc::now(),
        }
    }
}

/// Placeholder record for a pattern missing from the dataset
fn synthesize(pattern: &PatternDefinition) -> FeatureRecord {
    let mut record = FeatureRecord::new(
        pattern.id.clone(),
        pattern.name.clone(),
        pattern.risk_level.implied_baseline(),
    );
    record.description = format!(
        "{} (no dataset entry; baseline inferred from pattern risk)",
        pattern.name
    );
    record.group = Some(pattern.category.as_str().to_string());
    record
}
