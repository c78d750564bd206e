//! Human-readable advice drafted from an analysis

use std::collections::{BTreeMap, BTreeSet};

use featurescope_domain::{FeatureRecord, ProjectFeatureUsage, ResolutionChain};
use featurescope_knowledge::FeatureKnowledgeBase;
use featurescope_patterns::PatternRegistry;

/// Risk features that get an individual suggestion
pub const MAX_RISK_SUGGESTIONS: usize = 5;

/// Heuristic alternatives listed per risk feature when none are curated
const MAX_HEURISTIC_ALTERNATIVES: usize = 3;

/// Everything the drafter needs besides the analysis numbers
pub struct SuggestionContext<'a> {
    pub registry: &'a PatternRegistry,
    pub knowledge: &'a FeatureKnowledgeBase,
    pub target_browsers: &'a [String],
}

/// Numbers and usages the suggestions are drafted from
pub struct SuggestionInput<'a> {
    pub compatibility_score: f64,
    pub risk_features: &'a [ProjectFeatureUsage],
    pub safe_count: usize,
    /// Resolved feature id to the pattern that detected it
    pub detected: &'a BTreeMap<String, String>,
    pub analyzed_files: usize,
    pub total_files: usize,
}

impl SuggestionContext<'_> {
    /// Draft the suggestion list.
    ///
    /// Order: overall tier, top risk features, modernization hints, safe count,
    /// coverage.
    pub fn build(&self, input: &SuggestionInput<'_>) -> Vec<String> {
        let mut suggestions = vec![tier_message(input.compatibility_score)];

        for usage in input.risk_features.iter().take(MAX_RISK_SUGGESTIONS) {
            let pattern_id = input.detected.get(usage.feature.id()).map(String::as_str);
            suggestions.push(self.risk_suggestion(usage, pattern_id));
        }

        suggestions.extend(self.modernization_hints(input.detected));

        if input.safe_count > 0 {
            suggestions.push(format!(
                "{} feature{} in use {} widely supported",
                input.safe_count,
                if input.safe_count == 1 { "" } else { "s" },
                if input.safe_count == 1 { "is" } else { "are" },
            ));
        }

        if input.total_files > 0 {
            let coverage = input.analyzed_files as f64 / input.total_files as f64 * 100.0;
            suggestions.push(format!(
                "Analyzed {} of {} files ({:.0}% coverage)",
                input.analyzed_files, input.total_files, coverage
            ));
        }

        suggestions
    }

    fn risk_suggestion(&self, usage: &ProjectFeatureUsage, pattern_id: Option<&str>) -> String {
        let record = usage.feature.record();
        let mut message = format!(
            "'{}' has {} browser support ({} use{})",
            record.name,
            record.baseline,
            usage.usage_count,
            if usage.usage_count == 1 { "" } else { "s" },
        );

        let alternatives = self.alternatives_for(record, pattern_id);
        if !alternatives.is_empty() {
            message.push_str(&format!("; consider {}", alternatives.join(", ")));
        }

        if !record.support.is_empty() {
            let missing =
                FeatureKnowledgeBase::unsupported_browsers(record, self.target_browsers);
            if !missing.is_empty() {
                message.push_str(&format!("; not supported in {}", missing.join(", ")));
            }
        }

        message
    }

    /// Curated alternatives from the pattern, or widely available related features
    fn alternatives_for(&self, record: &FeatureRecord, pattern_id: Option<&str>) -> Vec<String> {
        let curated: Vec<String> = pattern_id
            .map(|id| self.registry.get_alternatives(id))
            .unwrap_or_default()
            .iter()
            .map(|alt| self.display_name(alt))
            .collect();
        if !curated.is_empty() {
            return curated;
        }

        self.knowledge
            .get_similar_features(&record.id)
            .into_iter()
            .filter(|candidate| candidate.is_widely())
            .take(MAX_HEURISTIC_ALTERNATIVES)
            .map(|candidate| candidate.name.clone())
            .collect()
    }

    fn modernization_hints(&self, detected: &BTreeMap<String, String>) -> Vec<String> {
        let present: BTreeSet<&str> = detected
            .iter()
            .flat_map(|(feature_id, pattern_id)| [feature_id.as_str(), pattern_id.as_str()])
            .collect();

        let mut hints = Vec::new();
        let mut seen = BTreeSet::new();
        for (feature_id, pattern_id) in detected {
            let Some(target) = self.registry.get_upgrade_path(pattern_id) else {
                continue;
            };
            let target_id = self.registry.resolve_feature_id(target).unwrap_or(target);
            if present.contains(target_id) || !seen.insert((feature_id.clone(), target_id)) {
                continue;
            }
            hints.push(format!(
                "Consider modernizing '{}' with '{}'",
                self.display_name(pattern_id),
                self.display_name(target_id)
            ));
        }
        hints
    }

    /// Knowledge-base name for a pattern id, falling back to the pattern name
    fn display_name(&self, pattern_id: &str) -> String {
        let Some(pattern) = self.registry.get_pattern(pattern_id) else {
            return pattern_id.to_string();
        };
        ResolutionChain::new(&pattern.id, pattern.aliases.iter().map(String::as_str))
            .resolve(|key| self.knowledge.get_feature(key))
            .map(|record| record.name.clone())
            .unwrap_or_else(|| pattern.name.clone())
    }
}

/// Overall verdict for a compatibility score
pub fn tier_message(score: f64) -> String {
    if score >= 90.0 {
        format!("Excellent compatibility (score {score:.0}): features in use are broadly supported")
    } else if score >= 70.0 {
        format!("Good compatibility (score {score:.0}): a few features need fallbacks")
    } else {
        format!("Poor compatibility (score {score:.0}): several features lack broad support")
    }
}
