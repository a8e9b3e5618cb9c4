//! Keyword-overlap scoring.
//!
//! score = |candidate skills ∩ job skills|. No weighting, no partial credit,
//! no penalty for skills the job does not ask for.

use std::collections::BTreeSet;

pub fn score(candidate_skills: &BTreeSet<String>, job_skills: &BTreeSet<String>) -> u32 {
    let overlap = candidate_skills.intersection(job_skills).count();
    u32::try_from(overlap).unwrap_or(u32::MAX)
}

/// Job skills the candidate covers, sorted.
pub fn matched_skills<'a>(
    candidate_skills: &'a BTreeSet<String>,
    job_skills: &'a BTreeSet<String>,
) -> Vec<&'a str> {
    candidate_skills
        .intersection(job_skills)
        .map(String::as_str)
        .collect()
}
