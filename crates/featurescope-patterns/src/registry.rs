//! Pattern registry: alias and category indices over the compiled catalog

use std::collections::{BTreeMap, BTreeSet, HashMap};

use featurescope_domain::LanguageFamily;
use regex::Regex;
use tracing::{debug, warn};

use crate::{
    catalog::{PatternSpec, BUILTIN_PATTERNS},
    error::{PatternError, PatternResult},
    location::LineIndex,
    models::{PatternCategory, PatternDefinition, PatternMatch, RiskLevel},
};

/// Read-only catalog of detection patterns.
///
/// Built once at start-up; every lookup is case-insensitive and resolves aliases
/// before falling back to the primary id.
#[derive(Debug)]
pub struct PatternRegistry {
    /// Definitions in catalog order
    patterns: Vec<PatternDefinition>,
    /// Primary id -> position in `patterns`
    by_id: HashMap<String, usize>,
    /// Lowercase alias -> primary id
    aliases: HashMap<String, String>,
    /// Category -> primary ids
    by_category: HashMap<PatternCategory, BTreeSet<String>>,
}

impl PatternRegistry {
    /// Registry over the built-in catalog
    pub fn new() -> Self {
        Self::from_specs(BUILTIN_PATTERNS)
    }

    /// Registry over a custom catalog.
    ///
    /// Expressions that fail to compile and aliases claimed twice are logged and
    /// skipped; the rest of the pattern is kept.
    pub fn from_specs(specs: &[PatternSpec]) -> Self {
        let mut registry = Self {
            patterns: Vec::with_capacity(specs.len()),
            by_id: HashMap::new(),
            aliases: HashMap::new(),
            by_category: HashMap::new(),
        };

        for spec in specs {
            let id = spec.id.to_ascii_lowercase();
            if registry.by_id.contains_key(&id) {
                warn!("Duplicate pattern id '{}' ignored", id);
                continue;
            }
            if let Some(owner) = registry.aliases.get(&id) {
                warn!("Pattern id '{}' is already an alias of '{}'; ignored", id, owner);
                continue;
            }

            let mut regexes = Vec::with_capacity(spec.regexes.len());
            for source in spec.regexes {
                match compile_pattern(&id, source) {
                    Ok(re) => regexes.push(re),
                    Err(err) => warn!("{}", err),
                }
            }

            let mut aliases = BTreeSet::new();
            for alias in spec.aliases {
                let alias = alias.to_ascii_lowercase();
                match registry.claim_alias(&alias, &id) {
                    Ok(()) => {
                        aliases.insert(alias);
                    }
                    Err(err) => warn!("{}", err),
                }
            }

            registry
                .by_category
                .entry(spec.category)
                .or_default()
                .insert(id.clone());
            registry.by_id.insert(id.clone(), registry.patterns.len());
            registry.patterns.push(PatternDefinition {
                id,
                name: spec.name.to_string(),
                aliases,
                regexes,
                category: spec.category,
                risk_level: spec.risk_level,
                alternatives: to_owned_ids(spec.alternatives),
                upgrade_to: spec.upgrade_to.map(str::to_ascii_lowercase),
                complementary: to_owned_ids(spec.complementary),
                supersedes: to_owned_ids(spec.supersedes),
            });
        }

        debug!(
            "Pattern registry built with {} patterns and {} aliases",
            registry.patterns.len(),
            registry.aliases.len()
        );
        registry
    }

    fn claim_alias(&mut self, alias: &str, id: &str) -> PatternResult<()> {
        let existing = self
            .aliases
            .get(alias)
            .cloned()
            .or_else(|| self.by_id.contains_key(alias).then(|| alias.to_string()));
        if let Some(existing) = existing {
            if existing != id {
                return Err(PatternError::AliasConflict {
                    alias: alias.to_string(),
                    pattern: id.to_string(),
                    existing,
                });
            }
        }
        self.aliases.insert(alias.to_string(), id.to_string());
        Ok(())
    }

    /// All definitions in catalog order
    pub fn patterns(&self) -> &[PatternDefinition] {
        &self.patterns
    }

    /// Number of patterns
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Whether the registry has no patterns
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Look up a pattern by primary id or alias
    pub fn get_pattern(&self, id_or_alias: &str) -> Option<&PatternDefinition> {
        let key = id_or_alias.trim().to_ascii_lowercase();
        let primary = self.aliases.get(&key).unwrap_or(&key);
        self.by_id.get(primary).map(|&index| &self.patterns[index])
    }

    /// Primary id for an id or alias
    pub fn resolve_feature_id(&self, id_or_alias: &str) -> Option<&str> {
        self.get_pattern(id_or_alias).map(|p| p.id.as_str())
    }

    /// Curated safer replacements
    pub fn get_alternatives(&self, id_or_alias: &str) -> &[String] {
        self.get_pattern(id_or_alias)
            .map(|p| p.alternatives.as_slice())
            .unwrap_or_default()
    }

    /// Curated companions
    pub fn get_complementary(&self, id_or_alias: &str) -> &[String] {
        self.get_pattern(id_or_alias)
            .map(|p| p.complementary.as_slice())
            .unwrap_or_default()
    }

    /// Curated upgrade target
    pub fn get_upgrade_path(&self, id_or_alias: &str) -> Option<&str> {
        self.get_pattern(id_or_alias)
            .and_then(|p| p.upgrade_to.as_deref())
    }

    /// Features the pattern replaces
    pub fn get_supersedes(&self, id_or_alias: &str) -> &[String] {
        self.get_pattern(id_or_alias)
            .map(|p| p.supersedes.as_slice())
            .unwrap_or_default()
    }

    /// Whether the pattern is curated as safe. Unknown ids are not safe.
    pub fn is_safe(&self, id_or_alias: &str) -> bool {
        self.get_pattern(id_or_alias)
            .is_some_and(|p| p.risk_level == RiskLevel::Safe)
    }

    /// Patterns of one category, in catalog order
    pub fn patterns_in_category(&self, category: PatternCategory) -> Vec<&PatternDefinition> {
        match self.by_category.get(&category) {
            Some(ids) => self
                .patterns
                .iter()
                .filter(|p| ids.contains(&p.id))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Patterns that run for a language id; all of them when none is given
    pub fn patterns_for_language(&self, language_id: Option<&str>) -> Vec<&PatternDefinition> {
        let family = language_id
            .map(LanguageFamily::from_language_id)
            .unwrap_or(LanguageFamily::Other);
        self.patterns
            .iter()
            .filter(|p| p.category.applies_to(family))
            .collect()
    }

    /// Count matches per pattern id, omitting patterns with no match
    pub fn detect_features(&self, text: &str, language_id: Option<&str>) -> BTreeMap<String, usize> {
        let mut detected = BTreeMap::new();
        if text.is_empty() {
            return detected;
        }

        for pattern in self.patterns_for_language(language_id) {
            let count = pattern.count_matches(text);
            if count > 0 {
                detected.insert(pattern.id.clone(), count);
            }
        }
        detected
    }

    /// Every match of one pattern with its position, ordered by offset
    pub fn locate(&self, id_or_alias: &str, text: &str) -> Vec<PatternMatch> {
        let Some(pattern) = self.get_pattern(id_or_alias) else {
            return Vec::new();
        };
        let index = LineIndex::new(text);
        locate_with_index(pattern, text, &index)
    }

    /// Like [`locate`](Self::locate) but reusing a line index built by the caller
    pub fn locate_indexed(
        &self,
        id_or_alias: &str,
        text: &str,
        index: &LineIndex,
    ) -> Vec<PatternMatch> {
        match self.get_pattern(id_or_alias) {
            Some(pattern) => locate_with_index(pattern, text, index),
            None => Vec::new(),
        }
    }
}

impl Default for PatternRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn locate_with_index(pattern: &PatternDefinition, text: &str, index: &LineIndex) -> Vec<PatternMatch> {
    let mut matches: Vec<PatternMatch> = pattern
        .regexes
        .iter()
        .flat_map(|re| re.find_iter(text))
        .map(|m| {
            let (line, column) = index.position(text, m.start());
            PatternMatch {
                pattern_id: pattern.id.clone(),
                start: m.start(),
                end: m.end(),
                line,
                column,
                text: m.as_str().to_string(),
            }
        })
        .collect();
    matches.sort_by_key(|m| m.start);
    matches
}

/// Compile one catalog expression
pub fn compile_pattern(pattern_id: &str, source: &str) -> PatternResult<Regex> {
    Regex::new(source).map_err(|source| PatternError::InvalidRegex {
        pattern: pattern_id.to_string(),
        source,
    })
}

fn to_owned_ids(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|id| id.to_ascii_lowercase()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_compiles() {
        for spec in BUILTIN_PATTERNS {
            for source in spec.regexes {
                assert!(
                    compile_pattern(spec.id, source).is_ok(),
                    "pattern {} has invalid regex {}",
                    spec.id,
                    source
                );
            }
        }
        let registry = PatternRegistry::new();
        assert_eq!(registry.len(), BUILTIN_PATTERNS.len());
        assert!(registry.len() >= 40);
    }

    #[test]
    fn test_relationship_targets_are_registered() {
        let registry = PatternRegistry::new();
        for pattern in registry.patterns() {
            let targets = pattern
                .alternatives
                .iter()
                .chain(&pattern.complementary)
                .chain(&pattern.supersedes)
                .chain(pattern.upgrade_to.iter());
            for target in targets {
                assert!(
                    registry.get_pattern(target).is_some(),
                    "{} references unknown pattern {}",
                    pattern.id,
                    target
                );
            }
        }
    }

    #[test]
    fn test_alias_resolution() {
        let registry = PatternRegistry::new();
        assert_eq!(registry.resolve_feature_id("css-has"), Some("has"));
        assert_eq!(registry.resolve_feature_id("CSS-HAS"), Some("has"));
        assert_eq!(registry.resolve_feature_id("flexbox-gap"), Some("gap"));
        assert_eq!(registry.resolve_feature_id("has"), Some("has"));
        assert_eq!(registry.resolve_feature_id("nope"), None);

        let via_alias = registry.get_pattern("css-grid").unwrap();
        let direct = registry.get_pattern("grid").unwrap();
        assert!(std::ptr::eq(via_alias, direct));
    }

    #[test]
    fn test_detect_grid_and_gap() {
        let registry = PatternRegistry::new();
        let detected = registry.detect_features("display: grid; gap: 10px;", Some("css"));
        assert_eq!(detected.len(), 2);
        assert_eq!(detected.get("grid"), Some(&1));
        assert_eq!(detected.get("gap"), Some(&1));
    }

    #[test]
    fn test_detect_has() {
        let registry = PatternRegistry::new();
        let detected = registry.detect_features(":has(.child) { color: red; }", Some("css"));
        assert_eq!(detected.len(), 1);
        assert_eq!(detected.get("has"), Some(&1));
    }

    #[test]
    fn test_empty_text_detects_nothing() {
        let registry = PatternRegistry::new();
        assert!(registry.detect_features("", Some("css")).is_empty());
        assert!(registry.detect_features("", None).is_empty());
    }

    #[test]
    fn test_language_scoping() {
        let registry = PatternRegistry::new();
        let source = "const r = await fetch(url); a { display: grid; }";

        let css = registry.detect_features(source, Some("css"));
        assert!(css.contains_key("grid"));
        assert!(!css.contains_key("fetch"));

        let js = registry.detect_features(source, Some("javascript"));
        assert!(js.contains_key("fetch"));
        assert!(js.contains_key("async-await"));
        assert!(!js.contains_key("grid"));

        let html = registry.detect_features(source, Some("html"));
        assert!(html.contains_key("fetch"));
        assert!(html.contains_key("grid"));
    }

    #[test]
    fn test_counts_sum_across_expressions() {
        let registry = PatternRegistry::new();
        let css = ".a { display: grid; grid-template-columns: 1fr 1fr; }\n.b { display: inline-grid; }";
        let detected = registry.detect_features(css, Some("css"));
        assert_eq!(detected.get("grid"), Some(&3));
    }

    #[test]
    fn test_overscroll_does_not_count_as_scroll_behavior() {
        let registry = PatternRegistry::new();
        let detected = registry.detect_features("overscroll-behavior: contain;", Some("css"));
        assert!(detected.contains_key("overscroll-behavior"));
        assert!(!detected.contains_key("scroll-behavior"));
    }

    #[test]
    fn test_relationship_projections() {
        let registry = PatternRegistry::new();
        assert_eq!(registry.get_alternatives("css-has"), &["is", "where", "not"]);
        assert_eq!(registry.get_upgrade_path("xmlhttprequest"), Some("fetch"));
        assert_eq!(registry.get_complementary("optional-chaining"), &["nullish-coalescing"]);
        assert_eq!(registry.get_supersedes("fetch"), &["xhr"]);
        assert!(registry.is_safe("grid"));
        assert!(!registry.is_safe("has"));
        assert!(!registry.is_safe("unknown-feature"));
        assert!(registry.get_alternatives("unknown-feature").is_empty());
    }

    #[test]
    fn test_locate_reports_positions() {
        let registry = PatternRegistry::new();
        let text = ".a {\n  display: grid;\n  gap: 4px;\n}";
        let matches = registry.locate("gap", text);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].line, 3);
        assert_eq!(matches[0].column, 3);
        assert_eq!(matches[0].text, "gap:");
    }

    #[test]
    fn test_invalid_regex_and_alias_conflict_are_skipped() {
        static SPECS: &[PatternSpec] = &[
            PatternSpec {
                id: "first",
                name: "First",
                aliases: &["shared"],
                regexes: &[r"first\(", r"(unclosed"],
                category: PatternCategory::Css,
                risk_level: RiskLevel::Safe,
                alternatives: &[],
                upgrade_to: None,
                complementary: &[],
                supersedes: &[],
            },
            PatternSpec {
                id: "second",
                name: "Second",
                aliases: &["shared", "first"],
                regexes: &[r"second\("],
                category: PatternCategory::Js,
                risk_level: RiskLevel::Moderate,
                alternatives: &[],
                upgrade_to: None,
                complementary: &[],
                supersedes: &[],
            },
        ];

        let registry = PatternRegistry::from_specs(SPECS);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get_pattern("first").unwrap().regexes.len(), 1);
        assert_eq!(registry.resolve_feature_id("shared"), Some("first"));
        assert_eq!(registry.resolve_feature_id("first"), Some("first"));
        assert!(registry.get_pattern("second").unwrap().aliases.is_empty());
        assert_eq!(registry.patterns_in_category(PatternCategory::Js).len(), 1);
    }
}
