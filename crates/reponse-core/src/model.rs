//! Core data model types for reponse.
//!
//! These are the fundamental types the evaluation pipeline uses to
//! represent incoming answers, committed verdicts, and the diagnostic
//! metadata attached for reviewers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Question difficulty, ordered from most lenient to strictest grading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    /// All difficulties in ascending strictness order.
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
    ];

    /// Stable index into per-difficulty tables (0..3).
    pub fn index(self) -> usize {
        match self {
            Difficulty::Beginner => 0,
            Difficulty::Intermediate => 1,
            Difficulty::Advanced => 2,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Beginner => write!(f, "beginner"),
            Difficulty::Intermediate => write!(f, "intermediate"),
            Difficulty::Advanced => write!(f, "advanced"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// The kind of exercise the learner answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    FreeTranslation,
    Conjugation,
    FillInBlank,
    OpenEnded,
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionKind::FreeTranslation => write!(f, "free_translation"),
            QuestionKind::Conjugation => write!(f, "conjugation"),
            QuestionKind::FillInBlank => write!(f, "fill_in_blank"),
            QuestionKind::OpenEnded => write!(f, "open_ended"),
        }
    }
}

/// A single evaluation request: one learner answer to one question.
///
/// `correct_answer` may be absent for fully open-ended questions; such
/// requests skip the exact and fuzzy tiers entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationRequest {
    /// The question as shown to the learner.
    pub question: String,
    /// The learner's typed answer.
    pub user_answer: String,
    /// Primary reference answer, if one exists.
    #[serde(default)]
    pub correct_answer: Option<String>,
    /// What kind of exercise this is.
    pub question_type: QuestionKind,
    /// Grading strictness.
    pub difficulty: Difficulty,
    /// Alternate reference strings treated as equally correct.
    #[serde(default)]
    pub acceptable_variations: Vec<String>,
    /// Opaque token; recognized reviewer tokens unlock diagnostic metadata.
    #[serde(default)]
    pub identity_token: Option<String>,
}

/// Categorized correction lists attached to a verdict.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Corrections {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub grammar: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub spelling: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accents: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl Corrections {
    /// True when no category carries any entries.
    pub fn is_empty(&self) -> bool {
        self.grammar.is_empty()
            && self.spelling.is_empty()
            && self.accents.is_empty()
            && self.suggestions.is_empty()
    }
}

/// Which reference string the fuzzy matcher selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchedAgainst {
    PrimaryAnswer,
    AcceptableVariation,
    None,
}

/// Diagnostic record of a fuzzy-tier match decision.
///
/// Constructed once inside the fuzzy tier, merged into
/// [`EvaluationMetadata`], and discarded with the response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchInfo {
    /// Which string won the similarity comparison.
    pub matched_against: MatchedAgainst,
    /// Index into `acceptable_variations`, present only for variation wins.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_variation_index: Option<usize>,
    /// Similarity (0-100) to the string that actually won.
    pub matched_similarity: u8,
    /// Human-readable explanation of the decision.
    pub evaluation_reason: String,
    /// The band the winning similarity fell into.
    pub correctness_band: String,
}

/// Which tier committed the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierName {
    EmptyCheck,
    ExactMatch,
    FuzzyMatch,
    SemanticFallback,
}

impl fmt::Display for TierName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TierName::EmptyCheck => write!(f, "empty_check"),
            TierName::ExactMatch => write!(f, "exact_match"),
            TierName::FuzzyMatch => write!(f, "fuzzy_match"),
            TierName::SemanticFallback => write!(f, "semantic_fallback"),
        }
    }
}

/// Diagnostic metadata, present only for authorized reviewers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationMetadata {
    /// The tier that produced the verdict.
    pub tier: TierName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_info: Option<MatchInfo>,
    /// Judge self-reported confidence (semantic tier only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_score: Option<u8>,
}

impl EvaluationMetadata {
    pub fn for_tier(tier: TierName) -> Self {
        Self {
            tier,
            match_info: None,
            confidence_score: None,
        }
    }
}

/// A committed evaluation verdict.
///
/// Invariant: `is_correct` is true iff `score` met the pass threshold of
/// the tier that committed the result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    pub is_correct: bool,
    /// 0-100.
    pub score: u8,
    pub has_correct_accents: bool,
    pub feedback: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corrections: Option<Corrections>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corrected_answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<EvaluationMetadata>,
}
