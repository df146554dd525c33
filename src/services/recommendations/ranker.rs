use super::pool::RecommendationPool;
use crate::models::CandidateRecommendation;

/// Orders the final pool by match score, descending
///
/// Equal scores fall back to ascending normalized key so that the output is
/// reproducible for a given pool; the tie order carries no meaning.
pub fn rank(pool: RecommendationPool) -> Vec<CandidateRecommendation> {
    let mut entries: Vec<_> = pool.into_entries().collect();

    entries.sort_by(|(key_a, a), (key_b, b)| {
        b.match_score
            .total_cmp(&a.match_score)
            .then_with(|| key_a.cmp(key_b))
    });

    entries.into_iter().map(|(_, candidate)| candidate).collect()
}
