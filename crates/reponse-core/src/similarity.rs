//! Edit-distance similarity scoring and reference matching.
//!
//! Similarity is `1 - normalized Levenshtein distance` scaled to 0-100,
//! where the distance is divided by the length of the longer string.
//! Identical strings score 100; the scorer is symmetric.

use crate::model::MatchedAgainst;
use crate::normalize::normalize;

/// Similarity between two strings on a 0-100 scale.
///
/// Inputs are compared as-is; callers that want accent- and
/// case-insensitive comparison normalize first (see [`best_match`]).
pub fn similarity(a: &str, b: &str) -> u8 {
    // strsim defines two empty strings as fully similar, matching the
    // contract that identical strings always score 100.
    let score = strsim::normalized_levenshtein(a, b) * 100.0;
    score.round().clamp(0.0, 100.0) as u8
}

/// The winner of a best-of comparison against primary + variations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BestMatch {
    /// Which reference string won.
    pub matched_against: MatchedAgainst,
    /// Index into the variation list, for variation wins only.
    pub variation_index: Option<usize>,
    /// Similarity (0-100) to the winning string, computed on normalized text.
    pub similarity: u8,
    /// The winning reference string, in its original (accented) form.
    pub matched_text: String,
}

/// Score a candidate answer against one primary reference and any number
/// of acceptable variations, and pick the best match.
///
/// All comparisons run on normalized text. Ties prefer the primary
/// reference over any variation, and earlier variations over later ones,
/// so selection is deterministic.
pub fn best_match(answer: &str, primary: &str, variations: &[String]) -> BestMatch {
    let candidate = normalize(answer);

    let mut best = BestMatch {
        matched_against: MatchedAgainst::PrimaryAnswer,
        variation_index: None,
        similarity: similarity(&candidate, &normalize(primary)),
        matched_text: primary.trim().to_string(),
    };

    for (index, variation) in variations.iter().enumerate() {
        let sim = similarity(&candidate, &normalize(variation));
        if sim > best.similarity {
            best = BestMatch {
                matched_against: MatchedAgainst::AcceptableVariation,
                variation_index: Some(index),
                similarity: sim,
                matched_text: variation.trim().to_string(),
            };
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_strings_score_100() {
        assert_eq!(similarity("bonjour", "bonjour"), 100);
        assert_eq!(similarity("", ""), 100);
    }

    #[test]
    fn disjoint_strings_score_low() {
        assert_eq!(similarity("abc", "xyz"), 0);
        assert_eq!(similarity("bonjour", ""), 0);
    }

    #[test]
    fn single_typo_scores_high() {
        let sim = similarity("boujour", "bonjour");
        assert!(sim >= 85, "expected high similarity, got {sim}");
        assert!(sim < 100);
    }

    #[test]
    fn symmetric() {
        assert_eq!(similarity("je suis", "je suit"), similarity("je suit", "je suis"));
    }

    #[test]
    fn scores_stay_in_range() {
        for (a, b) in [
            ("", "je ne sais pas"),
            ("a", "b"),
            ("très long texte ici", "x"),
            ("même", "meme"),
        ] {
            let sim = similarity(a, b);
            assert!(sim <= 100, "similarity {sim} out of range for {a:?}/{b:?}");
        }
    }

    #[test]
    fn primary_wins_ties() {
        // "salut" appears both as primary and as a variation.
        let best = best_match("salut", "salut", &["salut".to_string()]);
        assert_eq!(best.matched_against, MatchedAgainst::PrimaryAnswer);
        assert_eq!(best.variation_index, None);
        assert_eq!(best.similarity, 100);
    }

    #[test]
    fn variation_wins_when_strictly_better() {
        let best = best_match(
            "salut",
            "bonjour",
            &["coucou".to_string(), "salut".to_string()],
        );
        assert_eq!(best.matched_against, MatchedAgainst::AcceptableVariation);
        assert_eq!(best.variation_index, Some(1));
        assert_eq!(best.similarity, 100);
        assert_eq!(best.matched_text, "salut");
    }

    #[test]
    fn similarity_measured_against_winner_not_primary() {
        let best = best_match("couco", "bonjour", &["coucou".to_string()]);
        assert_eq!(best.matched_against, MatchedAgainst::AcceptableVariation);
        assert!(best.similarity >= 80);
    }

    #[test]
    fn empty_variation_list_uses_primary_only() {
        let best = best_match("bonjour", "bonjour", &[]);
        assert_eq!(best.matched_against, MatchedAgainst::PrimaryAnswer);
        assert_eq!(best.similarity, 100);
    }

    #[test]
    fn comparison_ignores_accents_and_case() {
        let best = best_match("ELEVE", "élève", &[]);
        assert_eq!(best.similarity, 100);
        // The original accented form is preserved for feedback.
        assert_eq!(best.matched_text, "élève");
    }
}
