//! "Did you mean" candidate ranking.

use std::cmp::Ordering;
use std::collections::HashSet;

/// Minimum normalized similarity for a non-prefix candidate.
pub const SIMILARITY_CUTOFF: f64 = 0.6;

pub const DEFAULT_LIMIT: usize = 3;

/// Rank `candidates` against a misspelled `query`.
///
/// Case-insensitive prefix matches come first in input order, then close
/// matches by descending similarity. Exact matches are never suggested.
#[must_use]
pub fn suggest<'a, I>(query: &str, candidates: I, limit: usize) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let query = query.to_lowercase();
    let mut seen = HashSet::new();
    let mut prefix = Vec::new();
    let mut scored = Vec::new();

    for candidate in candidates {
        let lower = candidate.to_lowercase();
        if lower == query || !seen.insert(candidate) {
            continue;
        }
        if !query.is_empty() && lower.starts_with(&query) {
            prefix.push(candidate.to_string());
            continue;
        }
        let score = strsim::normalized_damerau_levenshtein(&query, &lower);
        if score >= SIMILARITY_CUTOFF {
            scored.push((score, candidate));
        }
    }

    scored.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.1.cmp(b.1))
    });

    prefix
        .into_iter()
        .chain(scored.into_iter().map(|(_, name)| name.to_string()))
        .take(limit)
        .collect()
}
