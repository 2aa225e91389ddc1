//! The evaluate endpoint, minus the transport.
//!
//! [`EvaluationService`] is what a web handler calls: it validates the
//! request, applies rate limiting, runs the tier cascade, and gates the
//! diagnostic metadata. Errors map onto HTTP statuses via
//! [`EvalError::status_code`]; a successful call always carries a
//! committed, well-shaped result.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use crate::error::EvalError;
use crate::model::{EvaluationRequest, EvaluationResult};
use crate::ratelimit::RateLimiter;
use crate::tiers::TierDispatcher;

pub struct EvaluationService {
    dispatcher: TierDispatcher,
    limiter: Arc<RateLimiter>,
    reviewer_tokens: HashSet<String>,
}

impl EvaluationService {
    pub fn new(
        dispatcher: TierDispatcher,
        limiter: Arc<RateLimiter>,
        reviewer_tokens: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            dispatcher,
            limiter,
            reviewer_tokens: reviewer_tokens.into_iter().collect(),
        }
    }

    /// Evaluate one answer on behalf of `caller_key` (user id or client
    /// address, whatever the transport uses for rate limiting).
    pub async fn evaluate(
        &self,
        caller_key: &str,
        request: &EvaluationRequest,
    ) -> Result<EvaluationResult, EvalError> {
        if request.question.trim().is_empty() {
            return Err(EvalError::MissingField("question"));
        }

        let decision = self.limiter.check(caller_key);
        if !decision.allowed {
            let retry_after_secs = decision.retry_after_secs(Instant::now()).max(1);
            tracing::debug!(caller = caller_key, retry_after_secs, "rate limited");
            return Err(EvalError::RateLimited { retry_after_secs });
        }

        let mut result = self.dispatcher.evaluate(request).await;

        let authorized = request
            .identity_token
            .as_deref()
            .is_some_and(|token| self.reviewer_tokens.contains(token));
        if !authorized {
            result.metadata = None;
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bands::BandConfig;
    use crate::error::JudgeError;
    use crate::model::{Difficulty, QuestionKind};
    use crate::ratelimit::RateLimitConfig;
    use crate::traits::{JudgeRequest, Judgment, SemanticJudge};
    use async_trait::async_trait;
    use std::time::Duration;

    struct UnavailableJudge;

    #[async_trait]
    impl SemanticJudge for UnavailableJudge {
        fn name(&self) -> &str {
            "unavailable"
        }
        async fn judge(&self, _: &JudgeRequest) -> Result<Judgment, JudgeError> {
            Err(JudgeError::NetworkError("connection refused".into()))
        }
    }

    fn service(max_requests: usize) -> EvaluationService {
        let dispatcher = TierDispatcher::new(
            Arc::new(UnavailableJudge),
            BandConfig::default(),
            true,
        );
        let limiter = Arc::new(RateLimiter::new(RateLimitConfig {
            window: Duration::from_secs(60),
            max_requests,
        }));
        EvaluationService::new(dispatcher, limiter, vec!["reviewer-token".to_string()])
    }

    fn request(answer: &str, token: Option<&str>) -> EvaluationRequest {
        EvaluationRequest {
            question: "Translate: hello".into(),
            user_answer: answer.into(),
            correct_answer: Some("bonjour".into()),
            question_type: QuestionKind::FreeTranslation,
            difficulty: Difficulty::Beginner,
            acceptable_variations: vec![],
            identity_token: token.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn empty_question_rejected() {
        let service = service(10);
        let mut req = request("bonjour", None);
        req.question = "  ".into();
        let err = service.evaluate("alice", &req).await.unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn rate_limit_maps_to_429_with_retry_after() {
        let service = service(1);
        service.evaluate("alice", &request("bonjour", None)).await.unwrap();
        let err = service
            .evaluate("alice", &request("bonjour", None))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 429);
        assert!(err.retry_after_secs().unwrap() >= 1);
    }

    #[tokio::test]
    async fn metadata_stripped_without_token() {
        let service = service(10);
        let result = service
            .evaluate("alice", &request("bonjour", None))
            .await
            .unwrap();
        assert!(result.metadata.is_none());
        assert!(result.is_correct);
    }

    #[tokio::test]
    async fn metadata_stripped_for_unknown_token() {
        let service = service(10);
        let result = service
            .evaluate("alice", &request("bonjour", Some("wrong")))
            .await
            .unwrap();
        assert!(result.metadata.is_none());
    }

    #[tokio::test]
    async fn metadata_kept_for_reviewer() {
        let service = service(10);
        let result = service
            .evaluate("alice", &request("bonjour", Some("reviewer-token")))
            .await
            .unwrap();
        let metadata = result.metadata.expect("reviewer should see metadata");
        assert_eq!(
            metadata.tier,
            crate::model::TierName::ExactMatch
        );
    }

    #[tokio::test]
    async fn always_returns_well_shaped_result() {
        let service = service(100);
        for answer in ["", "x", "   ", &"a".repeat(10_000), "bonjour"] {
            let result = service.evaluate("k", &request(answer, None)).await.unwrap();
            assert!(result.score <= 100);
        }
    }
}
