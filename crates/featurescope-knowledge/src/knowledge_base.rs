//! Feature knowledge base with one-time asynchronous loading

use std::{
    collections::HashSet,
    sync::{Arc, OnceLock},
    time::Duration,
};

use featurescope_domain::{BaselineStatus, FeatureRecord};
use tokio::{sync::Mutex, task::JoinHandle, time::Instant};
use tracing::{debug, info, warn};

use crate::{
    error::{KnowledgeError, Result},
    index::FeatureIndex,
    source::{FeatureDataSource, JsonFeatureSource},
};

/// Interval between readiness checks in [`FeatureKnowledgeBase::wait_for_ready`]
const READY_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Maximum entries returned by [`FeatureKnowledgeBase::get_similar_features`]
pub const MAX_SIMILAR_FEATURES: usize = 10;

/// Indexed, read-only view of the feature dataset.
///
/// The index is built once. Until then every query returns nothing; after a failed
/// load the base is still ready, just empty.
pub struct FeatureKnowledgeBase {
    source: Arc<dyn FeatureDataSource>,
    index: OnceLock<FeatureIndex>,
    init_lock: Mutex<()>,
}

impl FeatureKnowledgeBase {
    /// Knowledge base reading from `source`
    pub fn new(source: Arc<dyn FeatureDataSource>) -> Self {
        Self {
            source,
            index: OnceLock::new(),
            init_lock: Mutex::new(()),
        }
    }

    /// Knowledge base reading the bundled dataset
    pub fn bundled() -> Self {
        Self::new(Arc::new(JsonFeatureSource::bundled()))
    }

    /// Load the dataset and build the indices.
    ///
    /// Safe to call more than once; only the first call loads.
    pub async fn initialize(&self) {
        if self.is_ready() {
            return;
        }
        let _guard = self.init_lock.lock().await;
        if self.is_ready() {
            return;
        }

        let index = match self.source.load().await {
            Ok(dataset) => {
                let index = FeatureIndex::build(
                    dataset
                        .into_iter()
                        .map(|(id, raw)| raw.into_record(&id)),
                );
                info!(
                    "Loaded {} features from source '{}'",
                    index.len(),
                    self.source.name()
                );
                index
            }
            Err(e) => {
                warn!(
                    "Feature dataset from '{}' unavailable, continuing with an empty index: {}",
                    self.source.name(),
                    e
                );
                FeatureIndex::default()
            }
        };

        let _ = self.index.set(index);
    }

    /// Start loading on a background task
    pub fn spawn_initialize(self: &Arc<Self>) -> JoinHandle<()> {
        let kb = Arc::clone(self);
        tokio::spawn(async move { kb.initialize().await })
    }

    /// Whether loading has finished (successfully or not)
    pub fn is_ready(&self) -> bool {
        self.index.get().is_some()
    }

    /// Poll until ready, failing once `timeout` has elapsed
    pub async fn wait_for_ready(&self, timeout: Duration) -> Result<()> {
        let started = Instant::now();
        let deadline = started + timeout;
        loop {
            if self.is_ready() {
                return Ok(());
            }
            let now = Instant::now();
            if now >= deadline {
                let waited_ms = now.duration_since(started).as_millis() as u64;
                debug!("Knowledge base still loading after {}ms", waited_ms);
                return Err(KnowledgeError::ReadinessTimeout { waited_ms });
            }
            tokio::time::sleep(READY_POLL_INTERVAL.min(deadline - now)).await;
        }
    }

    /// Number of loaded records
    pub fn len(&self) -> usize {
        self.index.get().map_or(0, FeatureIndex::len)
    }

    /// Whether no records are loaded
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Record by exact id
    pub fn get_feature(&self, id: &str) -> Option<Arc<FeatureRecord>> {
        self.index.get()?.get(id)
    }

    /// Record by exact id, or [`KnowledgeError::UnknownFeature`]
    pub fn require_feature(&self, id: &str) -> Result<Arc<FeatureRecord>> {
        self.get_feature(id)
            .ok_or_else(|| KnowledgeError::UnknownFeature { id: id.to_string() })
    }

    /// Every record, ordered by id
    pub fn all_features(&self) -> Vec<Arc<FeatureRecord>> {
        self.index.get().map(FeatureIndex::all).unwrap_or_default()
    }

    /// Records matching a free-text query.
    ///
    /// Exact id, exact name, id or name substring, then tag matches; each record
    /// appears once, at its first matching stage.
    pub fn search(&self, query: &str) -> Vec<Arc<FeatureRecord>> {
        let Some(index) = self.index.get() else {
            return Vec::new();
        };
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let mut seen = HashSet::new();
        let mut results = Vec::new();
        let mut push = |record: Arc<FeatureRecord>| {
            if seen.insert(record.id.clone()) {
                results.push(record);
            }
        };

        if let Some(record) = index.get(&needle) {
            push(record);
        }
        if let Some(record) = index.by_name(&needle) {
            push(record);
        }
        for record in index.all() {
            if record.id.to_lowercase().contains(&needle)
                || record.name.to_lowercase().contains(&needle)
            {
                push(record);
            }
        }
        for record in index.by_tag(&needle) {
            push(record);
        }

        results
    }

    /// Records in a baseline tier
    pub fn get_by_baseline(&self, status: BaselineStatus) -> Vec<Arc<FeatureRecord>> {
        self.index
            .get()
            .map(|index| index.by_baseline(status))
            .unwrap_or_default()
    }

    /// Records in a category (or group when the category is absent)
    pub fn get_by_category(&self, category: &str) -> Vec<Arc<FeatureRecord>> {
        self.index
            .get()
            .map(|index| index.by_category(category))
            .unwrap_or_default()
    }

    /// Records first supported in a given major version of a browser
    pub fn get_by_browser_version(&self, browser: &str, version: u32) -> Vec<Arc<FeatureRecord>> {
        self.index
            .get()
            .map(|index| index.by_browser_version(browser, version))
            .unwrap_or_default()
    }

    /// Coarse related-feature listing.
    ///
    /// Same category scores 3, same baseline tier scores 1; only positive scores
    /// are kept, highest first, at most [`MAX_SIMILAR_FEATURES`].
    pub fn get_similar_features(&self, id: &str) -> Vec<Arc<FeatureRecord>> {
        let Some(target) = self.get_feature(id) else {
            return Vec::new();
        };

        let mut scored: Vec<(u32, Arc<FeatureRecord>)> = self
            .all_features()
            .into_iter()
            .filter(|candidate| candidate.id != target.id)
            .filter_map(|candidate| {
                let mut score = 0;
                if candidate.category_key().is_some()
                    && candidate.category_key() == target.category_key()
                {
                    score += 3;
                }
                if candidate.baseline == target.baseline {
                    score += 1;
                }
                (score > 0).then_some((score, candidate))
            })
            .collect();

        scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.id.cmp(&b.1.id)));
        scored
            .into_iter()
            .take(MAX_SIMILAR_FEATURES)
            .map(|(_, record)| record)
            .collect()
    }

    /// Target browsers with no recorded support for a feature
    pub fn unsupported_browsers(record: &FeatureRecord, targets: &[String]) -> Vec<String> {
        targets
            .iter()
            .filter(|browser| record.version_for(browser).is_none())
            .cloned()
            .collect()
    }
}

impl std::fmt::Debug for FeatureKnowledgeBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureKnowledgeBase")
            .field("source", &self.source.name())
            .field("ready", &self.is_ready())
            .field("features", &self.len())
            .finish()
    }
}
