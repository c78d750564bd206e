//! Weight profiles for the composite score

use serde::{Deserialize, Serialize};

/// Relative weight of each sub-metric.
///
/// Weights need not sum to one; the composite divides by their total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimilarityWeights {
    pub name: f64,
    pub description: f64,
    pub category: f64,
    pub browser_support: f64,
    pub baseline: f64,
    pub temporal: f64,
}

impl Default for SimilarityWeights {
    fn default() -> Self {
        Self {
            name: 0.25,
            description: 0.15,
            category: 0.25,
            browser_support: 0.15,
            baseline: 0.10,
            temporal: 0.10,
        }
    }
}

impl SimilarityWeights {
    /// Profile for replacing a poorly supported feature: category and name dominate
    pub fn alternatives() -> Self {
        Self {
            name: 0.3,
            description: 0.1,
            category: 0.4,
            browser_support: 0.1,
            baseline: 0.05,
            temporal: 0.05,
        }
    }

    /// Profile for newer versions of a feature: name dominates
    pub fn upgrades() -> Self {
        Self {
            name: 0.5,
            description: 0.15,
            category: 0.2,
            browser_support: 0.05,
            baseline: 0.05,
            temporal: 0.05,
        }
    }

    /// Profile for features used together: category dominates
    pub fn complementary() -> Self {
        Self {
            name: 0.1,
            description: 0.2,
            category: 0.5,
            browser_support: 0.1,
            baseline: 0.05,
            temporal: 0.05,
        }
    }

    /// Sum of all weights
    pub fn total(&self) -> f64 {
        self.name
            + self.description
            + self.category
            + self.browser_support
            + self.baseline
            + self.temporal
    }
}
