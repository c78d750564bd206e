//! Final ordering of the candidate pool

use std::collections::HashMap;

use featurescope_domain::Recommendation;

/// Deduplicate by feature id and order the pool.
///
/// The highest-confidence entry per feature survives (the earliest on ties). Type
/// priority always dominates confidence: every alternative sorts above every
/// upgrade, and so on. The result is truncated to `limit`.
pub fn rank_recommendations(pool: Vec<Recommendation>, limit: usize) -> Vec<Recommendation> {
    let mut best: HashMap<String, usize> = HashMap::new();
    let mut kept: Vec<Option<Recommendation>> = Vec::with_capacity(pool.len());

    for candidate in pool {
        match best.get(&candidate.feature.id) {
            Some(&slot) => {
                let replace = kept[slot]
                    .as_ref()
                    .is_some_and(|current| candidate.confidence > current.confidence);
                if replace {
                    kept[slot] = Some(candidate);
                }
            }
            None => {
                best.insert(candidate.feature.id.clone(), kept.len());
                kept.push(Some(candidate));
            }
        }
    }

    let mut ranked: Vec<Recommendation> = kept.into_iter().flatten().collect();
    ranked.sort_by(|a, b| {
        a.kind
            .priority()
            .cmp(&b.kind.priority())
            .then_with(|| b.confidence.total_cmp(&a.confidence))
    });
    ranked.truncate(limit);
    ranked
}
