use crate::models::candidate::{CandidateRecord, RankedCandidate};

/// Sorts candidates by score, highest first, and assigns ranks 1..=n.
/// The sort is stable: equal scores keep their upload order.
pub fn rank_candidates(mut candidates: Vec<CandidateRecord>) -> Vec<RankedCandidate> {
    candidates.sort_by(|a, b| b.score.cmp(&a.score));
    candidates
        .into_iter()
        .zip(1u32..)
        .map(|(candidate, rank)| RankedCandidate { rank, candidate })
        .collect()
}
