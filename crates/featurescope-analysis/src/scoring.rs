//! Compatibility scoring and risk partitioning

use featurescope_domain::ProjectFeatureUsage;

/// Score reported when nothing was detected
pub const NO_FEATURES_SCORE: f64 = 100.0;

/// Usage-weighted average of per-feature baseline scores.
///
/// Each feature weighs `ln(usage_count + 1)`, so heavy use of one feature does not
/// drown out the rest. Rounded to two decimals.
pub fn compatibility_score<'a, I>(features: I) -> f64
where
    I: IntoIterator<Item = &'a ProjectFeatureUsage>,
{
    let (weighted, total_weight) = features
        .into_iter()
        .fold((0.0, 0.0), |(weighted, total), usage| {
            let weight = (usage.usage_count as f64 + 1.0).ln();
            (
                weighted + usage.feature.baseline().risk_score() * weight,
                total + weight,
            )
        });

    if total_weight <= 0.0 {
        return NO_FEATURES_SCORE;
    }
    ((weighted / total_weight) * 100.0).round() / 100.0
}

/// Split usages into `(risk, safe)`, each sorted by usage count descending
pub fn partition_by_risk<'a, I>(features: I) -> (Vec<ProjectFeatureUsage>, Vec<ProjectFeatureUsage>)
where
    I: IntoIterator<Item = &'a ProjectFeatureUsage>,
{
    let (mut risk, mut safe): (Vec<_>, Vec<_>) = features
        .into_iter()
        .cloned()
        .partition(|usage| usage.feature.baseline().is_at_risk());

    let by_usage = |a: &ProjectFeatureUsage, b: &ProjectFeatureUsage| {
        b.usage_count
            .cmp(&a.usage_count)
            .then_with(|| a.feature.id().cmp(b.feature.id()))
    };
    risk.sort_by(by_usage);
    safe.sort_by(by_usage);
    (risk, safe)
}
