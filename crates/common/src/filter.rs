use crate::name::PackageName;

/// Matches must score strictly above this to be kept.
pub const MIN_SCORE: i64 = 0;

const MATCH_SCORE: i64 = 16;
const CONSECUTIVE_BONUS: i64 = 12;
const START_BONUS: i64 = 12;
const BOUNDARY_BONUS: i64 = 8;
// Per skipped character, capped per gap so a match never drops to MIN_SCORE.
const GAP_PENALTY: i64 = 1;
const MAX_GAP_PENALTY: i64 = 8;

fn is_boundary(c: char) -> bool {
    matches!(c, '/' | '-' | '_' | '.' | '@' | ' ')
}

/// Score `candidate` against `query` as a case-insensitive subsequence.
///
/// Returns `None` when some query character cannot be found in order.
pub fn fuzzy_score(query: &str, candidate: &str) -> Option<i64> {
    let query: Vec<char> = query.to_lowercase().chars().collect();
    let candidate: Vec<char> = candidate.to_lowercase().chars().collect();

    if query.is_empty() {
        return Some(MIN_SCORE + 1);
    }

    let mut score = 0;
    let mut cursor = 0;
    let mut previous: Option<usize> = None;

    for q in query {
        let offset = candidate[cursor..].iter().position(|&c| c == q)?;
        let index = cursor + offset;

        score += MATCH_SCORE;
        if index == 0 {
            score += START_BONUS;
        } else if is_boundary(candidate[index - 1]) {
            score += BOUNDARY_BONUS;
        }

        match previous {
            Some(p) if p + 1 == index => score += CONSECUTIVE_BONUS,
            Some(p) => score -= ((index - p - 1) as i64 * GAP_PENALTY).min(MAX_GAP_PENALTY),
            None => score -= (index as i64 * GAP_PENALTY).min(MAX_GAP_PENALTY),
        }

        previous = Some(index);
        cursor = index + 1;
    }

    Some(score)
}

/// Keep the names matching `query`, best first.
///
/// Matching runs on the readable form; the returned names still carry their
/// encoded identifiers. An empty query returns the input unchanged. Equal
/// scores keep their input order.
pub fn fuzzy_filter(query: &str, names: &[PackageName]) -> Vec<PackageName> {
    let query = query.trim();
    if query.is_empty() {
        return names.to_vec();
    }

    let mut scored: Vec<(i64, &PackageName)> = names
        .iter()
        .filter_map(|name| fuzzy_score(query, name.display()).map(|score| (score, name)))
        .filter(|(score, _)| *score > MIN_SCORE)
        .collect();

    // sort_by is stable, so ties stay in index order
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    tracing::debug!(query, matched = scored.len(), total = names.len(), "filtered package index");

    scored.into_iter().map(|(_, name)| name.clone()).collect()
}
