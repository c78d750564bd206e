//! Feature dataset sources
//!
//! A source yields the raw `id -> fields` map in the shape used by web-features
//! style datasets. Conversion into [`FeatureRecord`]s happens here so the index
//! never sees raw JSON.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use chrono::NaiveDate;
use featurescope_domain::{BaselineStatus, FeatureRecord};
use serde::{Deserialize, Serialize};

use crate::error::{KnowledgeError, Result};

/// Dataset bundled with the crate
const BUNDLED_DATASET: &str = include_str!("../data/features.json");

/// Raw dataset keyed by feature id
pub type RawDataset = BTreeMap<String, RawFeature>;

/// Keywords added as tags when they occur in a feature's name or description
pub const TAG_KEYWORDS: &[&str] = &[
    "layout",
    "grid",
    "flex",
    "animation",
    "transition",
    "color",
    "selector",
    "scroll",
    "responsive",
    "async",
    "promise",
    "observer",
    "storage",
    "worker",
    "accessibility",
    "performance",
];

/// A field that datasets write either as one string or as a list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }
}

/// Baseline value as written in the dataset: `false`, `"low"` or `"high"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawBaseline {
    Flag(bool),
    Tier(String),
}

impl RawBaseline {
    /// Tier for this raw value
    pub fn to_status(&self) -> BaselineStatus {
        match self {
            RawBaseline::Flag(true) => BaselineStatus::Widely,
            RawBaseline::Flag(false) => BaselineStatus::Limited,
            RawBaseline::Tier(tier) => BaselineStatus::from_raw(tier),
        }
    }
}

/// Status block of a raw feature
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawStatus {
    #[serde(default)]
    pub baseline: Option<RawBaseline>,
    #[serde(default)]
    pub baseline_low_date: Option<String>,
    #[serde(default)]
    pub baseline_high_date: Option<String>,
    #[serde(default)]
    pub support: BTreeMap<String, String>,
}

/// One feature as written in the dataset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFeature {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub description_html: Option<String>,
    #[serde(default)]
    pub status: Option<RawStatus>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub group: Option<OneOrMany>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub spec: Option<OneOrMany>,
    #[serde(default)]
    pub caniuse: Option<OneOrMany>,
}

impl RawFeature {
    /// Convert into a record, deriving keyword tags from the name and description.
    ///
    /// A missing baseline maps to `Unknown`, a missing name falls back to the id.
    pub fn into_record(self, id: &str) -> FeatureRecord {
        let status = self.status.unwrap_or_default();
        let baseline = status
            .baseline
            .as_ref()
            .map(RawBaseline::to_status)
            .unwrap_or(BaselineStatus::Unknown);

        let name = self.name.unwrap_or_else(|| id.to_string());
        let description = self
            .description
            .or(self.description_html)
            .unwrap_or_default();

        let mut tags: BTreeSet<String> = self
            .tags
            .into_iter()
            .map(|tag| tag.to_lowercase())
            .collect();
        let haystack = format!("{} {}", name, description).to_lowercase();
        for keyword in TAG_KEYWORDS {
            if haystack.contains(keyword) {
                tags.insert((*keyword).to_string());
            }
        }

        let mut links = self.spec.map(OneOrMany::into_vec).unwrap_or_default();
        links.extend(
            self.caniuse
                .map(OneOrMany::into_vec)
                .unwrap_or_default()
                .into_iter()
                .map(|key| format!("https://caniuse.com/{key}")),
        );

        FeatureRecord {
            id: id.to_string(),
            name,
            description,
            baseline,
            baseline_low_date: status.baseline_low_date.as_deref().and_then(parse_date),
            baseline_high_date: status.baseline_high_date.as_deref().and_then(parse_date),
            support: status.support,
            category: self.category,
            group: self
                .group
                .and_then(|group| group.into_vec().into_iter().next()),
            tags,
            links,
        }
    }
}

impl From<&FeatureRecord> for RawFeature {
    fn from(record: &FeatureRecord) -> Self {
        let baseline = match record.baseline {
            BaselineStatus::Widely => Some(RawBaseline::Tier("high".to_string())),
            BaselineStatus::Newly => Some(RawBaseline::Tier("low".to_string())),
            BaselineStatus::Limited => Some(RawBaseline::Flag(false)),
            BaselineStatus::Unknown => None,
        };
        Self {
            name: Some(record.name.clone()),
            description: Some(record.description.clone()),
            description_html: None,
            status: Some(RawStatus {
                baseline,
                baseline_low_date: record.baseline_low_date.map(|d| d.to_string()),
                baseline_high_date: record.baseline_high_date.map(|d| d.to_string()),
                support: record.support.clone(),
            }),
            category: record.category.clone(),
            group: record.group.clone().map(OneOrMany::One),
            tags: record.tags.iter().cloned().collect(),
            spec: (!record.links.is_empty()).then(|| OneOrMany::Many(record.links.clone())),
            caniuse: None,
        }
    }
}

/// Parse `YYYY-MM-DD`, tolerating a leading `≤` range marker
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim().trim_start_matches('≤');
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()
}

/// Something that can produce the raw feature dataset
#[async_trait]
pub trait FeatureDataSource: Send + Sync {
    /// Load the full dataset
    async fn load(&self) -> Result<RawDataset>;

    /// Name used in logs
    fn name(&self) -> &str;
}

/// Dataset parsed from JSON text
#[derive(Debug, Clone)]
pub struct JsonFeatureSource {
    json: String,
    name: String,
}

impl JsonFeatureSource {
    /// Source reading the given JSON document
    pub fn new(name: impl Into<String>, json: impl Into<String>) -> Self {
        Self {
            json: json.into(),
            name: name.into(),
        }
    }

    /// Source reading the dataset bundled with the crate
    pub fn bundled() -> Self {
        Self::new("bundled", BUNDLED_DATASET)
    }
}

#[async_trait]
impl FeatureDataSource for JsonFeatureSource {
    async fn load(&self) -> Result<RawDataset> {
        if self.json.trim().is_empty() {
            return Err(KnowledgeError::DatasetUnavailable {
                reason: format!("source '{}' is empty", self.name),
            });
        }
        Ok(serde_json::from_str(&self.json)?)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// In-memory dataset, mostly for hosts that already hold records
#[derive(Debug, Clone, Default)]
pub struct StaticFeatureSource {
    dataset: RawDataset,
}

impl StaticFeatureSource {
    /// Source serving a prepared raw dataset
    pub fn new(dataset: RawDataset) -> Self {
        Self { dataset }
    }

    /// Source serving the given records
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = FeatureRecord>,
    {
        let dataset = records
            .into_iter()
            .map(|record| (record.id.clone(), RawFeature::from(&record)))
            .collect();
        Self { dataset }
    }
}

#[async_trait]
impl FeatureDataSource for StaticFeatureSource {
    async fn load(&self) -> Result<RawDataset> {
        Ok(self.dataset.clone())
    }

    fn name(&self) -> &str {
        "static"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bundled_dataset_parses() {
        let dataset = JsonFeatureSource::bundled().load().await.unwrap();
        assert!(dataset.len() >= 40);
        assert!(dataset.contains_key("grid"));
        assert!(dataset.contains_key("css-is"));
    }

    #[test]
    fn test_raw_baseline_mapping() {
        let json = r#"{
            "a": { "name": "A", "status": { "baseline": "high" } },
            "b": { "name": "B", "status": { "baseline": "low" } },
            "c": { "name": "C", "status": { "baseline": false } },
            "d": { "name": "D" }
        }"#;
        let dataset: RawDataset = serde_json::from_str(json).unwrap();
        let status = |id: &str| dataset[id].clone().into_record(id).baseline;

        assert_eq!(status("a"), BaselineStatus::Widely);
        assert_eq!(status("b"), BaselineStatus::Newly);
        assert_eq!(status("c"), BaselineStatus::Limited);
        assert_eq!(status("d"), BaselineStatus::Unknown);
    }

    #[test]
    fn test_into_record_fields() {
        let json = r#"{
            "name": "Grid",
            "description": "Two-dimensional layout",
            "status": {
                "baseline": "high",
                "baseline_low_date": "≤2017-10-17",
                "support": { "chrome": "57" }
            },
            "group": ["css", "layout"],
            "tags": ["Positioning"],
            "spec": "https://drafts.csswg.org/css-grid-1/",
            "caniuse": "css-grid"
        }"#;
        let raw: RawFeature = serde_json::from_str(json).unwrap();
        let record = raw.into_record("grid");

        assert_eq!(record.name, "Grid");
        assert_eq!(
            record.baseline_low_date,
            NaiveDate::from_ymd_opt(2017, 10, 17)
        );
        assert_eq!(record.group.as_deref(), Some("css"));
        assert!(record.tags.contains("positioning"));
        assert!(record.tags.contains("layout"));
        assert!(record.tags.contains("grid"));
        assert_eq!(record.links.len(), 2);
        assert_eq!(record.links[1], "https://caniuse.com/css-grid");
    }

    #[test]
    fn test_missing_name_falls_back_to_id() {
        let record = RawFeature::default().into_record("mystery");
        assert_eq!(record.name, "mystery");
        assert_eq!(record.baseline, BaselineStatus::Unknown);
    }

    #[tokio::test]
    async fn test_static_source_round_trips_records() {
        let mut record = FeatureRecord::new("has", ":has()", BaselineStatus::Limited);
        record.category = Some("selectors".to_string());
        let source = StaticFeatureSource::from_records(vec![record]);

        let dataset = source.load().await.unwrap();
        let restored = dataset["has"].clone().into_record("has");
        assert_eq!(restored.baseline, BaselineStatus::Limited);
        assert_eq!(restored.category.as_deref(), Some("selectors"));
    }

    #[tokio::test]
    async fn test_empty_json_is_unavailable() {
        let source = JsonFeatureSource::new("empty", "  ");
        assert!(matches!(
            source.load().await,
            Err(KnowledgeError::DatasetUnavailable { .. })
        ));
    }
}
