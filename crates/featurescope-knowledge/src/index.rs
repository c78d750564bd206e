//! Secondary indices over the loaded records

use std::{
    collections::{BTreeSet, HashMap},
    sync::Arc,
};

use featurescope_domain::{BaselineStatus, FeatureRecord};

/// Immutable lookup tables built once from the dataset
#[derive(Debug, Default)]
pub struct FeatureIndex {
    records: HashMap<String, Arc<FeatureRecord>>,
    ids: BTreeSet<String>,
    by_baseline: HashMap<BaselineStatus, BTreeSet<String>>,
    by_browser_version: HashMap<(String, u32), BTreeSet<String>>,
    by_category: HashMap<String, BTreeSet<String>>,
    by_tag: HashMap<String, BTreeSet<String>>,
    by_name: HashMap<String, String>,
}

impl FeatureIndex {
    /// Build every index from the given records
    pub fn build<I>(records: I) -> Self
    where
        I: IntoIterator<Item = FeatureRecord>,
    {
        let mut index = Self::default();
        for record in records {
            index.insert(Arc::new(record));
        }
        index
    }

    fn insert(&mut self, record: Arc<FeatureRecord>) {
        let id = record.id.clone();

        self.by_baseline
            .entry(record.baseline)
            .or_default()
            .insert(id.clone());

        for browser in record.support.keys() {
            if let Some(version) = record.version_for(browser) {
                self.by_browser_version
                    .entry((browser.clone(), version.floor() as u32))
                    .or_default()
                    .insert(id.clone());
            }
        }

        if let Some(category) = record.category_key() {
            self.by_category
                .entry(category.to_string())
                .or_default()
                .insert(id.clone());
        }

        for tag in &record.tags {
            self.by_tag.entry(tag.clone()).or_default().insert(id.clone());
        }

        self.by_name
            .entry(record.name.to_lowercase())
            .or_insert_with(|| id.clone());

        self.ids.insert(id.clone());
        self.records.insert(id, record);
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the index holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record by exact id
    pub fn get(&self, id: &str) -> Option<Arc<FeatureRecord>> {
        self.records.get(id).cloned()
    }

    /// Every record, ordered by id
    pub fn all(&self) -> Vec<Arc<FeatureRecord>> {
        self.collect(&self.ids)
    }

    /// Record whose lowercased name equals `name`
    pub fn by_name(&self, name: &str) -> Option<Arc<FeatureRecord>> {
        self.by_name
            .get(&name.to_lowercase())
            .and_then(|id| self.get(id))
    }

    /// Records in a baseline tier, ordered by id
    pub fn by_baseline(&self, status: BaselineStatus) -> Vec<Arc<FeatureRecord>> {
        self.by_baseline
            .get(&status)
            .map(|ids| self.collect(ids))
            .unwrap_or_default()
    }

    /// Records in a category (or group), ordered by id
    pub fn by_category(&self, category: &str) -> Vec<Arc<FeatureRecord>> {
        self.by_category
            .get(category)
            .map(|ids| self.collect(ids))
            .unwrap_or_default()
    }

    /// Records first supported in exactly this major browser version
    pub fn by_browser_version(&self, browser: &str, version: u32) -> Vec<Arc<FeatureRecord>> {
        self.by_browser_version
            .get(&(browser.to_string(), version))
            .map(|ids| self.collect(ids))
            .unwrap_or_default()
    }

    /// Records carrying a tag
    pub fn by_tag(&self, tag: &str) -> Vec<Arc<FeatureRecord>> {
        self.by_tag
            .get(&tag.to_lowercase())
            .map(|ids| self.collect(ids))
            .unwrap_or_default()
    }

    fn collect(&self, ids: &BTreeSet<String>) -> Vec<Arc<FeatureRecord>> {
        ids.iter().filter_map(|id| self.get(id)).collect()
    }
}
