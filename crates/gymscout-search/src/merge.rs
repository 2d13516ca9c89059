//! Merge/dedup engine — collapse all candidates for one gym into a winner.
//!
//! Dedup key is the exact `(name, address)` string pair, no normalization.
//! Within a key the max-confidence candidate survives (strict `>` replaces,
//! so first-seen wins ties); the overall winner is the max-confidence
//! survivor, again first-seen on ties.

use std::collections::HashMap;

use gymscout_core::types::SearchCandidate;

/// Merge all candidates for one gym. Returns `None` on empty input.
pub fn merge(candidates: Vec<SearchCandidate>) -> Option<SearchCandidate> {
    let mut survivors: Vec<SearchCandidate> = Vec::new();
    let mut index: HashMap<(String, String), usize> = HashMap::new();

    for candidate in candidates {
        let key = (candidate.name.clone(), candidate.address.clone());
        match index.get(&key).copied() {
            Some(slot) => {
                if candidate.confidence > survivors[slot].confidence {
                    survivors[slot] = candidate;
                }
            }
            None => {
                index.insert(key, survivors.len());
                survivors.push(candidate);
            }
        }
    }

    survivors.into_iter().fold(None, |best, candidate| match best {
        Some(current) if current.confidence >= candidate.confidence => Some(current),
        _ => Some(candidate),
    })
}
