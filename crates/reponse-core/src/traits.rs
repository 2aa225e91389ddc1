//! Trait seams to the external language-model judge.
//!
//! These async traits are implemented by the `reponse-judge` crate; the
//! tier dispatcher and batch classifier only ever see the traits, so
//! tests can substitute scripted judges.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::JudgeError;
use crate::model::{Corrections, Difficulty, QuestionKind};

/// Context handed to the semantic judge for one evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgeRequest {
    pub question: String,
    pub question_type: QuestionKind,
    pub difficulty: Difficulty,
    /// The primary reference answer, when one exists.
    pub reference_answer: Option<String>,
    pub user_answer: String,
}

/// A validated structured judgment from the external service.
///
/// `confidence_score` is diagnostic-only; it is surfaced through
/// evaluation metadata and never through the public result shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Judgment {
    pub is_correct: bool,
    pub score: u8,
    pub has_correct_accents: bool,
    pub feedback: String,
    #[serde(default)]
    pub corrections: Option<Corrections>,
    #[serde(default)]
    pub corrected_answer: Option<String>,
    #[serde(default)]
    pub confidence_score: Option<u8>,
}

impl Judgment {
    /// The verdict committed when the judge cannot be reached or replies
    /// with garbage. Neutral score, not correct, no confidence.
    pub fn safe_default() -> Self {
        Self {
            is_correct: false,
            score: 50,
            has_correct_accents: false,
            feedback: "could not evaluate automatically".to_string(),
            corrections: None,
            corrected_answer: None,
            confidence_score: None,
        }
    }
}

/// An external service that can grade a free-text answer against a rubric.
#[async_trait]
pub trait SemanticJudge: Send + Sync {
    /// Human-readable judge name (e.g. "openai").
    fn name(&self) -> &str;

    /// Grade one answer. Implementations report transport and shape
    /// failures as errors; they never invent a verdict.
    async fn judge(&self, request: &JudgeRequest) -> Result<Judgment, JudgeError>;
}

/// An external service that can rate the difficulty of a stored question.
///
/// Returns the raw label text; callers normalize it defensively.
#[async_trait]
pub trait DifficultyRater: Send + Sync {
    async fn rate_difficulty(
        &self,
        question: &str,
        reference_answer: Option<&str>,
    ) -> Result<String, JudgeError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_default_shape() {
        let judgment = Judgment::safe_default();
        assert!(!judgment.is_correct);
        assert_eq!(judgment.score, 50);
        assert_eq!(judgment.feedback, "could not evaluate automatically");
        assert!(judgment.confidence_score.is_none());
    }

    #[test]
    fn judgment_parses_wire_shape() {
        let json = r#"{
            "isCorrect": true,
            "score": 92,
            "hasCorrectAccents": true,
            "feedback": "Bien joué",
            "confidenceScore": 88
        }"#;
        let judgment: Judgment = serde_json::from_str(json).unwrap();
        assert!(judgment.is_correct);
        assert_eq!(judgment.score, 92);
        assert_eq!(judgment.confidence_score, Some(88));
        assert!(judgment.corrections.is_none());
    }
}
