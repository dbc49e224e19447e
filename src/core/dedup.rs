use crate::domain::model::CandidateHit;
use std::collections::HashSet;

/// Keeps one hit per (link path, element) key, the nearest one seen first.
pub fn deduplicate(hits: Vec<CandidateHit>) -> Vec<CandidateHit> {
    let mut seen = HashSet::with_capacity(hits.len());
    hits.into_iter().filter(|hit| seen.insert(hit.key())).collect()
}
