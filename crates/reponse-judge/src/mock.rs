//! Mock judge for testing the cascade and the batch classifier without
//! real API calls.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use reponse_core::error::JudgeError;
use reponse_core::traits::{DifficultyRater, JudgeRequest, Judgment, SemanticJudge};

/// A scripted judge. Judgments are selected by answer-substring match;
/// difficulty labels by question-substring match.
pub struct MockJudge {
    /// Map of answer substring to judgment.
    judgments: HashMap<String, Judgment>,
    default_judgment: Judgment,
    /// Map of question substring to difficulty-label reply.
    labels: HashMap<String, String>,
    default_label: String,
    /// When set, every call fails with a network error.
    unavailable: bool,
    call_count: AtomicU32,
    last_request: Mutex<Option<JudgeRequest>>,
}

impl MockJudge {
    pub fn new() -> Self {
        Self {
            judgments: HashMap::new(),
            default_judgment: Judgment {
                is_correct: true,
                score: 90,
                has_correct_accents: true,
                feedback: "mock judgment".to_string(),
                corrections: None,
                corrected_answer: None,
                confidence_score: Some(75),
            },
            labels: HashMap::new(),
            default_label: "intermediate".to_string(),
            unavailable: false,
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// A judge that always returns the same judgment.
    pub fn with_fixed_judgment(judgment: Judgment) -> Self {
        Self {
            default_judgment: judgment,
            ..Self::new()
        }
    }

    /// A judge whose every call fails, exercising the safe-default path.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::new()
        }
    }

    /// Script a judgment for answers containing `answer_substring`.
    pub fn with_judgment(mut self, answer_substring: &str, judgment: Judgment) -> Self {
        self.judgments.insert(answer_substring.to_string(), judgment);
        self
    }

    /// Script a difficulty label for questions containing `question_substring`.
    pub fn with_label(mut self, question_substring: &str, label: &str) -> Self {
        self.labels
            .insert(question_substring.to_string(), label.to_string());
        self
    }

    /// Set the label returned when no substring matches.
    pub fn with_default_label(mut self, label: &str) -> Self {
        self.default_label = label.to_string();
        self
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    pub fn last_request(&self) -> Option<JudgeRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

impl Default for MockJudge {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SemanticJudge for MockJudge {
    fn name(&self) -> &str {
        "mock"
    }

    async fn judge(&self, request: &JudgeRequest) -> Result<Judgment, JudgeError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self.last_request.lock().unwrap() = Some(request.clone());

        if self.unavailable {
            return Err(JudgeError::NetworkError("mock judge unavailable".into()));
        }

        let judgment = self
            .judgments
            .iter()
            .find(|(key, _)| request.user_answer.contains(key.as_str()))
            .map(|(_, j)| j.clone())
            .unwrap_or_else(|| self.default_judgment.clone());
        Ok(judgment)
    }
}

#[async_trait]
impl DifficultyRater for MockJudge {
    async fn rate_difficulty(
        &self,
        question: &str,
        _reference_answer: Option<&str>,
    ) -> Result<String, JudgeError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);

        if self.unavailable {
            return Err(JudgeError::NetworkError("mock judge unavailable".into()));
        }

        let label = self
            .labels
            .iter()
            .find(|(key, _)| question.contains(key.as_str()))
            .map(|(_, v)| v.clone())
            .unwrap_or_else(|| self.default_label.clone());
        Ok(label)
    }
}
