//! Strict-first fusion of two ranked hit lists.

use std::collections::HashSet;

use quarry_core::types::Hit;

/// Keep every strict hit in rank order, then fill the remaining slots with
/// relaxed hits not already present. Strict hits stay ahead of relaxed ones
/// regardless of score.
pub fn merge(strict: Vec<Hit>, relaxed: Vec<Hit>, requested_count: usize) -> Vec<Hit> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut merged = Vec::with_capacity(requested_count.min(strict.len() + relaxed.len()));
    for hit in strict.into_iter().chain(relaxed) {
        if merged.len() >= requested_count {
            break;
        }
        if seen.insert(hit.doc_id.clone()) {
            merged.push(hit);
        }
    }
    merged
}
