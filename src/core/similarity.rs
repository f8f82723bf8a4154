//! "Did you mean" ranking shared by property and template variable errors.

use strsim::levenshtein;

/// Maximum Levenshtein distance, as a percentage of the target length.
const SIMILARITY_THRESHOLD_PERCENT: usize = 50;

/// Candidates closest to `target`, best first, at most three.
///
/// Ties are broken alphabetically so suggestions are stable.
pub fn find_similar<I, S>(target: &str, candidates: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let max_distance = target.len() * SIMILARITY_THRESHOLD_PERCENT / 100;
    let mut scored: Vec<(usize, String)> = candidates
        .into_iter()
        .map(|candidate| {
            let candidate = candidate.as_ref();
            (levenshtein(target, candidate), candidate.to_string())
        })
        .filter(|(dist, _)| *dist <= max_distance)
        .collect();
    scored.sort();

    scored.into_iter().take(3).map(|(_, candidate)| candidate).collect()
}
