//! Data models for detection patterns

use std::collections::BTreeSet;

use featurescope_domain::{BaselineStatus, LanguageFamily};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Which kind of source a pattern applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternCategory {
    /// Stylesheet syntax
    Css,
    /// JavaScript language features
    Js,
    /// Markup elements and attributes
    Html,
    /// Browser APIs called from script
    Api,
}

impl PatternCategory {
    /// Lowercase name of the category
    pub fn as_str(self) -> &'static str {
        match self {
            PatternCategory::Css => "css",
            PatternCategory::Js => "js",
            PatternCategory::Html => "html",
            PatternCategory::Api => "api",
        }
    }

    /// Whether patterns of this category run for a language family.
    ///
    /// CSS-family documents only see CSS patterns, script documents see language and
    /// API patterns, markup documents (which embed both) and unknown languages see
    /// everything.
    pub fn applies_to(self, family: LanguageFamily) -> bool {
        match family {
            LanguageFamily::Css => self == PatternCategory::Css,
            LanguageFamily::Js => matches!(self, PatternCategory::Js | PatternCategory::Api),
            LanguageFamily::Html | LanguageFamily::Other => true,
        }
    }
}

/// Curated risk of using a feature today
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Safe to use everywhere
    Safe,
    /// Usable with care or a fallback
    Moderate,
    /// Not ready for production without a fallback
    Experimental,
}

impl RiskLevel {
    /// Baseline tier assumed for a pattern whose feature is missing from the dataset
    pub fn implied_baseline(self) -> BaselineStatus {
        match self {
            RiskLevel::Safe => BaselineStatus::Widely,
            RiskLevel::Moderate => BaselineStatus::Newly,
            RiskLevel::Experimental => BaselineStatus::Limited,
        }
    }
}

/// A compiled detection rule
#[derive(Debug, Clone)]
pub struct PatternDefinition {
    /// Primary id
    pub id: String,
    /// Display name
    pub name: String,
    /// Alternate keys resolving to this pattern
    pub aliases: BTreeSet<String>,
    /// Detection expressions, in catalog order
    pub regexes: Vec<Regex>,
    /// Source kind
    pub category: PatternCategory,
    /// Curated risk
    pub risk_level: RiskLevel,
    /// Safer features that can replace this one
    pub alternatives: Vec<String>,
    /// Newer feature this one should be upgraded to
    pub upgrade_to: Option<String>,
    /// Features commonly used alongside this one
    pub complementary: Vec<String>,
    /// Older features this one replaces
    pub supersedes: Vec<String>,
}

impl PatternDefinition {
    /// Total number of matches of every expression in `text`
    pub fn count_matches(&self, text: &str) -> usize {
        self.regexes.iter().map(|re| re.find_iter(text).count()).sum()
    }
}

/// One located match of a pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternMatch {
    /// Primary id of the matching pattern
    pub pattern_id: String,
    /// Byte offset of the match start
    pub start: usize,
    /// Byte offset of the match end
    pub end: usize,
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based, in characters)
    pub column: usize,
    /// Matched text
    pub text: String,
}
