//! Data models for feature records, usage aggregation and recommendations

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    sync::Arc,
};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Browser-support maturity tier of a feature.
///
/// Risk ordering is `Widely > Newly > Limited > Unknown`. `Unknown` is its own tier
/// (no data available) but shares the risk treatment of `Limited`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaselineStatus {
    /// Interoperable across core browsers for a long time
    Widely,
    /// Recently became interoperable across core browsers
    Newly,
    /// Not available in every core browser
    Limited,
    /// No baseline data
    Unknown,
}

impl BaselineStatus {
    /// All tiers in risk order, safest first
    pub const ALL: [BaselineStatus; 4] = [
        BaselineStatus::Widely,
        BaselineStatus::Newly,
        BaselineStatus::Limited,
        BaselineStatus::Unknown,
    ];

    /// Map a raw dataset value onto a tier.
    ///
    /// Accepts both the tier names and the `high`/`low`/`false` vocabulary used by
    /// web-features style datasets. Anything unrecognized maps to `Unknown`.
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "widely" | "high" => BaselineStatus::Widely,
            "newly" | "low" => BaselineStatus::Newly,
            "limited" | "false" => BaselineStatus::Limited,
            _ => BaselineStatus::Unknown,
        }
    }

    /// Per-feature score used by the project compatibility average
    pub fn risk_score(self) -> f64 {
        match self {
            BaselineStatus::Widely => 100.0,
            BaselineStatus::Newly => 70.0,
            BaselineStatus::Limited | BaselineStatus::Unknown => 30.0,
        }
    }

    /// Whether the tier is `Limited` or `Unknown`
    pub fn is_limited_or_unknown(self) -> bool {
        matches!(self, BaselineStatus::Limited | BaselineStatus::Unknown)
    }

    /// Whether a feature in this tier counts as a compatibility risk
    pub fn is_at_risk(self) -> bool {
        self != BaselineStatus::Widely
    }

    /// Lowercase name of the tier
    pub fn as_str(self) -> &'static str {
        match self {
            BaselineStatus::Widely => "widely",
            BaselineStatus::Newly => "newly",
            BaselineStatus::Limited => "limited",
            BaselineStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for BaselineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A web-platform feature as known to the knowledge base.
///
/// Records are immutable once loaded and shared behind `Arc`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    /// Unique, stable key
    pub id: String,
    /// Display name
    pub name: String,
    /// Plain or HTML description
    pub description: String,
    /// Baseline tier
    pub baseline: BaselineStatus,
    /// Date the feature became newly available
    pub baseline_low_date: Option<NaiveDate>,
    /// Date the feature became widely available
    pub baseline_high_date: Option<NaiveDate>,
    /// Minimum supporting version per browser
    pub support: BTreeMap<String, String>,
    /// Fine-grained category
    pub category: Option<String>,
    /// Broader feature group
    pub group: Option<String>,
    /// Free-text tags
    pub tags: BTreeSet<String>,
    /// External links (standards, MDN, caniuse)
    pub links: Vec<String>,
}

impl FeatureRecord {
    /// Create a record with only an id, a name and a tier
    pub fn new(id: impl Into<String>, name: impl Into<String>, baseline: BaselineStatus) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            baseline,
            baseline_low_date: None,
            baseline_high_date: None,
            support: BTreeMap::new(),
            category: None,
            group: None,
            tags: BTreeSet::new(),
            links: Vec::new(),
        }
    }

    /// Category used for indexing: the fine-grained category, or the group when absent
    pub fn category_key(&self) -> Option<&str> {
        self.category.as_deref().or(self.group.as_deref())
    }

    /// Whether the feature is widely available
    pub fn is_widely(&self) -> bool {
        self.baseline == BaselineStatus::Widely
    }

    /// Parsed minimum version for a browser, if recorded
    pub fn version_for(&self, browser: &str) -> Option<f64> {
        self.support.get(browser).and_then(|v| parse_version(v))
    }
}

/// Parse a browser version string such as `"105"`, `"15.4"` or `"≤79"`.
///
/// Returns `None` for values without a leading number (`"preview"`).
pub fn parse_version(raw: &str) -> Option<f64> {
    let trimmed = raw.trim_start_matches(|c: char| !c.is_ascii_digit());
    let end = trimmed
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(trimmed.len());
    let numeric = &trimmed[..end];
    let mut parts = numeric.split('.');
    let major = parts.next().filter(|p| !p.is_empty())?;
    match parts.next().filter(|p| !p.is_empty()) {
        Some(minor) => format!("{major}.{minor}").parse().ok(),
        None => major.parse().ok(),
    }
}

/// A feature record paired with its provenance.
///
/// `Synthesized` records are heuristic placeholders created when a detected pattern
/// has no counterpart in the dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", content = "record", rename_all = "lowercase")]
pub enum ResolvedFeature {
    /// Authoritative record from the knowledge base
    Resolved(Arc<FeatureRecord>),
    /// Placeholder guessed from pattern metadata
    Synthesized(Arc<FeatureRecord>),
}

impl ResolvedFeature {
    /// The underlying record
    pub fn record(&self) -> &Arc<FeatureRecord> {
        match self {
            ResolvedFeature::Resolved(record) | ResolvedFeature::Synthesized(record) => record,
        }
    }

    /// Whether the record is a heuristic placeholder
    pub fn is_synthesized(&self) -> bool {
        matches!(self, ResolvedFeature::Synthesized(_))
    }

    /// Feature id
    pub fn id(&self) -> &str {
        &self.record().id
    }

    /// Baseline tier
    pub fn baseline(&self) -> BaselineStatus {
        self.record().baseline
    }
}

/// Exact place where a pattern matched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageLocation {
    /// File name as supplied by the document provider
    pub file: String,
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based, in characters)
    pub column: usize,
    /// Text that matched
    pub matched_text: String,
}

/// Aggregated usage of one feature across an analysis pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectFeatureUsage {
    /// The feature that was detected
    pub feature: ResolvedFeature,
    /// Total number of matches
    pub usage_count: usize,
    /// Files containing at least one match
    pub files: BTreeSet<String>,
    /// Every match location
    pub locations: Vec<UsageLocation>,
}

impl ProjectFeatureUsage {
    /// Start an empty aggregation for a feature
    pub fn new(feature: ResolvedFeature) -> Self {
        Self {
            feature,
            usage_count: 0,
            files: BTreeSet::new(),
            locations: Vec::new(),
        }
    }

    /// Fold one document's matches into the aggregate
    pub fn record_usage(&mut self, file: &str, count: usize, locations: Vec<UsageLocation>) {
        self.usage_count += count;
        self.files.insert(file.to_string());
        self.locations.extend(locations);
    }
}

/// Kind of recommendation, in ranking priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationType {
    /// A safer feature that can replace the current one
    Alternative,
    /// A newer feature that supersedes the current one
    Upgrade,
    /// A feature commonly used together with the current one
    Complementary,
    /// A generally useful modern feature for the document's language
    Contextual,
}

impl RecommendationType {
    /// Ranking priority; lower sorts first
    pub fn priority(self) -> u8 {
        match self {
            RecommendationType::Alternative => 0,
            RecommendationType::Upgrade => 1,
            RecommendationType::Complementary => 2,
            RecommendationType::Contextual => 3,
        }
    }
}

/// A ranked suggestion produced by the recommendation engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Recommended feature
    pub feature: Arc<FeatureRecord>,
    /// Human-readable justification
    pub reason: String,
    /// Endorsement strength in `[0, 1]`
    pub confidence: f64,
    /// Recommendation kind
    #[serde(rename = "type")]
    pub kind: RecommendationType,
}

impl Recommendation {
    /// Create a recommendation, clamping confidence into `[0, 1]`
    pub fn new(
        feature: Arc<FeatureRecord>,
        reason: impl Into<String>,
        confidence: f64,
        kind: RecommendationType,
    ) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self {
            feature,
            reason: reason.into(),
            confidence,
            kind,
        }
    }
}
