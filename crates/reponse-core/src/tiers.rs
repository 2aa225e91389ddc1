//! The tiered evaluation cascade.
//!
//! Tiers are ordered by increasing cost and decreasing determinism:
//! empty check, exact match, fuzzy match, semantic fallback. Each tier
//! either commits a verdict or falls through; the dispatcher is a fold
//! over the ordered list stopping at the first commit. The semantic
//! tier always commits, so every request terminates with a result.

use std::sync::Arc;

use async_trait::async_trait;

use crate::bands::{BandConfig, CorrectnessBand};
use crate::model::{
    Corrections, EvaluationMetadata, EvaluationRequest, EvaluationResult, MatchInfo, TierName,
};
use crate::normalize::{accents_match, normalize};
use crate::similarity::best_match;
use crate::traits::{JudgeRequest, Judgment, SemanticJudge};

/// Minimum semantic-judge score counted as correct.
pub const SEMANTIC_PASS_THRESHOLD: u8 = 70;

/// One stage of the evaluation cascade.
#[async_trait]
pub trait EvalTier: Send + Sync {
    fn name(&self) -> TierName;

    /// Commit a verdict, or return `None` to fall through.
    async fn evaluate(&self, request: &EvaluationRequest) -> Option<EvaluationResult>;
}

/// Rejects answers too short to grade at all.
pub struct EmptyCheck;

#[async_trait]
impl EvalTier for EmptyCheck {
    fn name(&self) -> TierName {
        TierName::EmptyCheck
    }

    async fn evaluate(&self, request: &EvaluationRequest) -> Option<EvaluationResult> {
        if request.user_answer.trim().chars().count() >= 2 {
            return None;
        }
        Some(EvaluationResult {
            is_correct: false,
            score: 0,
            has_correct_accents: false,
            feedback: "answer too short".to_string(),
            corrections: None,
            corrected_answer: None,
            metadata: Some(EvaluationMetadata::for_tier(TierName::EmptyCheck)),
        })
    }
}

/// Commits on normalized equality with the primary reference.
pub struct ExactMatch;

#[async_trait]
impl EvalTier for ExactMatch {
    fn name(&self) -> TierName {
        TierName::ExactMatch
    }

    async fn evaluate(&self, request: &EvaluationRequest) -> Option<EvaluationResult> {
        let reference = request.correct_answer.as_deref()?;
        if normalize(&request.user_answer) != normalize(reference) {
            return None;
        }

        // Full credit only when casing and accents are intact too.
        let collapse = |s: &str| s.split_whitespace().collect::<Vec<_>>().join(" ");
        let verbatim = collapse(&request.user_answer) == collapse(reference);
        let reference_form = reference.trim().to_string();

        let result = if verbatim {
            EvaluationResult {
                is_correct: true,
                score: 100,
                has_correct_accents: true,
                feedback: "Parfait! Exactly right.".to_string(),
                corrections: None,
                corrected_answer: None,
                metadata: Some(EvaluationMetadata::for_tier(TierName::ExactMatch)),
            }
        } else {
            EvaluationResult {
                is_correct: true,
                score: 98,
                has_correct_accents: accents_match(&request.user_answer, reference),
                feedback: "Correct, but watch the exact written form.".to_string(),
                corrections: Some(Corrections {
                    accents: vec![format!("expected form: {reference_form}")],
                    ..Default::default()
                }),
                corrected_answer: Some(reference_form),
                metadata: Some(EvaluationMetadata::for_tier(TierName::ExactMatch)),
            }
        };
        Some(result)
    }
}

/// Similarity scoring against the primary reference and variations.
pub struct FuzzyMatch {
    bands: BandConfig,
    enabled: bool,
}

impl FuzzyMatch {
    pub fn new(bands: BandConfig, enabled: bool) -> Self {
        Self { bands, enabled }
    }
}

#[async_trait]
impl EvalTier for FuzzyMatch {
    fn name(&self) -> TierName {
        TierName::FuzzyMatch
    }

    async fn evaluate(&self, request: &EvaluationRequest) -> Option<EvaluationResult> {
        if !self.enabled {
            return None;
        }
        let reference = request.correct_answer.as_deref()?;

        let best = best_match(&request.user_answer, reference, &request.acceptable_variations);
        let band = self.bands.classify(best.similarity, request.difficulty);
        if !band.commits() {
            tracing::debug!(
                similarity = best.similarity,
                difficulty = %request.difficulty,
                "no fuzzy verdict, deferring to semantic tier"
            );
            return None;
        }

        let accents_ok = accents_match(&request.user_answer, &best.matched_text);
        let mut corrections = Corrections::default();
        if !accents_ok {
            corrections
                .accents
                .push(format!("check accents against: {}", best.matched_text));
        }
        if band == CorrectnessBand::PartialMatch {
            corrections
                .suggestions
                .push(format!("expected: {}", best.matched_text));
        } else if band == CorrectnessBand::CloseMatch {
            corrections
                .spelling
                .push(format!("small differences from: {}", best.matched_text));
        }

        let match_info = MatchInfo {
            matched_against: best.matched_against,
            matched_variation_index: best.variation_index,
            matched_similarity: best.similarity,
            evaluation_reason: format!(
                "similarity {} to {} reference ({})",
                best.similarity,
                match best.variation_index {
                    Some(i) => format!("variation #{i}"),
                    None => "primary".to_string(),
                },
                band.label()
            ),
            correctness_band: band.to_string(),
        };

        let corrected_answer =
            (best.similarity < 100).then(|| best.matched_text.clone());

        Some(EvaluationResult {
            is_correct: band.is_passing(),
            score: band.score(),
            has_correct_accents: accents_ok,
            feedback: format!("{}.", capitalize(band.label())),
            corrections: (!corrections.is_empty()).then_some(corrections),
            corrected_answer,
            metadata: Some(EvaluationMetadata {
                tier: TierName::FuzzyMatch,
                match_info: Some(match_info),
                confidence_score: None,
            }),
        })
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Delegates to the external judge; always commits.
pub struct SemanticFallback {
    judge: Arc<dyn SemanticJudge>,
}

impl SemanticFallback {
    pub fn new(judge: Arc<dyn SemanticJudge>) -> Self {
        Self { judge }
    }
}

#[async_trait]
impl EvalTier for SemanticFallback {
    fn name(&self) -> TierName {
        TierName::SemanticFallback
    }

    async fn evaluate(&self, request: &EvaluationRequest) -> Option<EvaluationResult> {
        let judge_request = JudgeRequest {
            question: request.question.clone(),
            question_type: request.question_type,
            difficulty: request.difficulty,
            reference_answer: request.correct_answer.clone(),
            user_answer: request.user_answer.clone(),
        };

        let judgment = match self.judge.judge(&judge_request).await {
            Ok(judgment) => judgment,
            Err(e) => {
                tracing::warn!(judge = self.judge.name(), error = %e, "semantic judge failed, committing safe default");
                Judgment::safe_default()
            }
        };

        Some(result_from_judgment(judgment))
    }
}

/// Convert a judgment into a committed result, deriving correctness from
/// the pass threshold so the score/verdict invariant holds even when the
/// judge's own flag disagrees.
fn result_from_judgment(judgment: Judgment) -> EvaluationResult {
    EvaluationResult {
        is_correct: judgment.score >= SEMANTIC_PASS_THRESHOLD,
        score: judgment.score.min(100),
        has_correct_accents: judgment.has_correct_accents,
        feedback: judgment.feedback,
        corrections: judgment.corrections,
        corrected_answer: judgment.corrected_answer,
        metadata: Some(EvaluationMetadata {
            tier: TierName::SemanticFallback,
            match_info: None,
            confidence_score: judgment.confidence_score,
        }),
    }
}

/// The ordered cascade. Visits each tier at most once per request and
/// stops at the first committed verdict.
pub struct TierDispatcher {
    tiers: Vec<Box<dyn EvalTier>>,
}

impl TierDispatcher {
    pub fn new(judge: Arc<dyn SemanticJudge>, bands: BandConfig, fuzzy_enabled: bool) -> Self {
        Self {
            tiers: vec![
                Box::new(EmptyCheck),
                Box::new(ExactMatch),
                Box::new(FuzzyMatch::new(bands, fuzzy_enabled)),
                Box::new(SemanticFallback::new(judge)),
            ],
        }
    }

    /// Run the cascade. Always returns a committed result.
    pub async fn evaluate(&self, request: &EvaluationRequest) -> EvaluationResult {
        for tier in &self.tiers {
            if let Some(result) = tier.evaluate(request).await {
                tracing::debug!(tier = %tier.name(), score = result.score, "tier committed verdict");
                return result;
            }
        }
        // The semantic tier always commits; this is the terminal backstop
        // for a misconfigured tier list.
        result_from_judgment(Judgment::safe_default())
    }
}
