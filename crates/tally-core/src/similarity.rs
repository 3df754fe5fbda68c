//! String similarity for merchant matching
//!
//! Two flavors are used by the engine:
//! - [`similarity`]: blended token-Jaccard + edit-distance score in `[0, 1]`,
//!   used by the merchant lexicon to autocorrect OCR'd names
//! - [`fuzzy_match`]: cheaper yes/no test (containment or bounded edit
//!   distance), used by the categorizer against its exact-name sets
//!
//! Both expect normalized keys; comparisons are case-sensitive.

use std::collections::HashSet;

/// Bonus added when the first tokens share a 3-character prefix
const PREFIX_BONUS: f64 = 0.03;

/// Levenshtein edit distance (insertions, deletions, substitutions), counted in chars.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Two rows instead of the full matrix
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr: Vec<usize> = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Whitespace tokens as a set
fn token_set(s: &str) -> HashSet<&str> {
    s.split_whitespace().collect()
}

/// Jaccard index of the two token sets; 0.0 when both are empty
fn jaccard(a: &str, b: &str) -> f64 {
    let a = token_set(a);
    let b = token_set(b);
    let union = a.union(&b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(&b).count() as f64 / union as f64
}

/// True if the first whitespace tokens of both strings share a 3-char prefix
fn shares_leading_prefix(a: &str, b: &str) -> bool {
    let prefix = |s: &str| -> Option<String> {
        let first = s.split_whitespace().next()?;
        if first.chars().count() < 3 {
            return None;
        }
        Some(first.chars().take(3).collect())
    };

    match (prefix(a), prefix(b)) {
        (Some(pa), Some(pb)) => pa == pb,
        _ => false,
    }
}

/// Blended similarity in `[0, 1]`:
/// `0.6 * jaccard(tokens) + 0.4 * (1 - levenshtein / max_len)`,
/// plus a small bonus for a shared leading prefix, capped at 1.0.
pub fn similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }

    let max_len = a.chars().count().max(b.chars().count()).max(1);
    let edit_score = 1.0 - levenshtein(a, b) as f64 / max_len as f64;

    let mut score = 0.6 * jaccard(a, b) + 0.4 * edit_score;
    if shares_leading_prefix(a, b) {
        score += PREFIX_BONUS;
    }

    score.min(1.0)
}

/// Cheap fuzzy equality: equal, one contains the other, or the edit distance
/// is within a length-scaled tolerance of `max(1, min(3, max_len / 6))`.
pub fn fuzzy_match(a: &str, b: &str) -> bool {
    if a == b || a.contains(b) || b.contains(a) {
        return true;
    }

    let max_len = a.chars().count().max(b.chars().count());
    let tolerance = (max_len / 6).min(3).max(1);
    levenshtein(a, b) <= tolerance
}
