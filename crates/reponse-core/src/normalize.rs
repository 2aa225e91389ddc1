//! Text canonicalization for equality comparison.
//!
//! French learner answers routinely differ from references only in
//! casing, stray whitespace, or missing diacritics. [`normalize`] folds
//! all three away so the cheap tiers can compare on equal footing.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Canonicalize text for comparison.
///
/// Applies NFD decomposition, strips combining marks, lowercases, trims,
/// and collapses internal whitespace runs to single spaces. Total on any
/// input and idempotent: `normalize(normalize(x)) == normalize(x)`.
pub fn normalize(text: &str) -> String {
    let stripped: String = text.nfd().filter(|c| !is_combining_mark(*c)).collect();
    stripped
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whether two strings carry the same accents in the same order.
///
/// Compares the sequences of combining marks after case folding, so
/// "eleve" vs "élève" differ while "élève" vs "Élève" agree.
pub fn accents_match(a: &str, b: &str) -> bool {
    accent_signature(a) == accent_signature(b)
}

fn accent_signature(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|c| is_combining_mark(*c))
        .collect()
}
