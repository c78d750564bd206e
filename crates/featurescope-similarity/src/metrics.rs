//! Individual similarity sub-metrics
//!
//! Every function returns a value in `[0, 1]`.

use std::collections::HashSet;

use featurescope_domain::FeatureRecord;

/// Maximum version gap (in major versions) that still counts as similar support
const VERSION_SPREAD: f64 = 50.0;

/// Jaccard index of two token sets, 0 when both are empty
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

fn word_set(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Remove `<...>` markup, leaving the text between tags
pub fn strip_html_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for c in text.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                out.push(' ');
            }
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

/// Name similarity.
///
/// Exact name or id equality scores 1.0, a name contained in the other 0.8,
/// otherwise a blend of word overlap and edit distance.
pub fn name_similarity(a: &FeatureRecord, b: &FeatureRecord) -> f64 {
    if a.id == b.id || a.name == b.name {
        return 1.0;
    }
    let name_a = a.name.to_lowercase();
    let name_b = b.name.to_lowercase();
    if name_a == name_b {
        return 1.0;
    }
    if !name_a.is_empty()
        && !name_b.is_empty()
        && (name_a.contains(&name_b) || name_b.contains(&name_a))
    {
        return 0.8;
    }

    let words = jaccard(&word_set(&name_a), &word_set(&name_b));
    let edit = strsim::normalized_levenshtein(&name_a, &name_b);
    (0.6 * words + 0.4 * edit).clamp(0.0, 1.0)
}

/// Jaccard similarity of the tag-stripped, lowercased description tokens
pub fn description_similarity(a: &FeatureRecord, b: &FeatureRecord) -> f64 {
    let tokens = |text: &str| -> HashSet<String> {
        strip_html_tags(text)
            .split_whitespace()
            .map(str::to_lowercase)
            .collect()
    };
    let tokens_a = tokens(&a.description);
    let tokens_b = tokens(&b.description);
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }
    jaccard(&tokens_a, &tokens_b)
}

/// Category similarity.
///
/// Same category scores 1.0. When either side has no category, a shared group
/// scores 0.8. Otherwise overlapping tags score up to 0.6.
pub fn category_similarity(a: &FeatureRecord, b: &FeatureRecord) -> f64 {
    match (&a.category, &b.category) {
        (Some(cat_a), Some(cat_b)) if cat_a == cat_b => return 1.0,
        (Some(_), Some(_)) => {}
        _ => {
            if a.group.is_some() && a.group == b.group {
                return 0.8;
            }
        }
    }

    let overlap = a.tags.intersection(&b.tags).count();
    if overlap == 0 {
        return 0.0;
    }
    let larger = a.tags.len().max(b.tags.len());
    0.6 * overlap as f64 / larger as f64
}

/// Browser support similarity.
///
/// Averages `1 - |Δversion| / 50` over the browsers both support, scaled by the
/// share of common browsers relative to the larger support table.
pub fn browser_support_similarity(a: &FeatureRecord, b: &FeatureRecord) -> f64 {
    if a.support.is_empty() || b.support.is_empty() {
        return 0.0;
    }

    let per_browser: Vec<f64> = a
        .support
        .keys()
        .filter_map(|browser| {
            let version_a = a.version_for(browser)?;
            let version_b = b.version_for(browser)?;
            Some((1.0 - (version_a - version_b).abs() / VERSION_SPREAD).max(0.0))
        })
        .collect();
    if per_browser.is_empty() {
        return 0.0;
    }

    let average = per_browser.iter().sum::<f64>() / per_browser.len() as f64;
    let coverage = per_browser.len() as f64 / a.support.len().max(b.support.len()) as f64;
    (average * coverage).clamp(0.0, 1.0)
}

/// Baseline tier similarity: identical tiers 1.0, both limited or unknown 0.8
pub fn baseline_similarity(a: &FeatureRecord, b: &FeatureRecord) -> f64 {
    if a.baseline == b.baseline {
        1.0
    } else if a.baseline.is_limited_or_unknown() && b.baseline.is_limited_or_unknown() {
        0.8
    } else {
        0.0
    }
}

/// Proximity of the dates both features became newly available
pub fn temporal_similarity(a: &FeatureRecord, b: &FeatureRecord) -> f64 {
    let (Some(date_a), Some(date_b)) = (a.baseline_low_date, b.baseline_low_date) else {
        return 0.0;
    };
    match (date_a - date_b).num_days().abs() {
        0..=365 => 1.0,
        366..=730 => 0.7,
        731..=1095 => 0.4,
        _ => 0.0,
    }
}
