//! HTTP judge over an OpenAI-compatible chat completion endpoint.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use reponse_core::error::JudgeError;
use reponse_core::traits::{DifficultyRater, JudgeRequest, Judgment, SemanticJudge};

use crate::config::JudgeConfig;
use crate::prompt::{
    build_difficulty_prompt, build_judgment_prompt, JUDGE_SYSTEM_PROMPT, RATER_SYSTEM_PROMPT,
};

const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Judge backed by an OpenAI-compatible `/v1/chat/completions` endpoint.
pub struct HttpJudge {
    api_key: String,
    base_url: String,
    model: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl HttpJudge {
    pub fn new(config: &JudgeConfig) -> Self {
        let timeout_secs = config.timeout_secs;
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("failed to build HTTP client");

        Self {
            api_key: config.api_key.clone(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: config.model.clone(),
            timeout_secs,
            client,
        }
    }

    async fn chat(&self, system: &str, user: String) -> Result<String, JudgeError> {
        let body = ChatRequest {
            model: self.model.clone(),
            temperature: 0.0,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user,
                },
            ],
        };

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    JudgeError::Timeout(self.timeout_secs)
                } else {
                    JudgeError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(5)
                * 1000;
            return Err(JudgeError::RateLimited {
                retry_after_ms: retry_after,
            });
        }
        if status == 401 {
            let body = response.text().await.unwrap_or_default();
            return Err(JudgeError::AuthenticationFailed(body));
        }
        if status == 404 {
            return Err(JudgeError::ModelNotFound(self.model.clone()));
        }
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(JudgeError::ApiError { status, message });
        }

        let api_response: ChatResponse =
            response.json().await.map_err(|e| JudgeError::ApiError {
                status: 0,
                message: format!("failed to parse response: {e}"),
            })?;

        api_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| JudgeError::MalformedReply("no choices in reply".to_string()))
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    temperature: f64,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReplyMessage,
}

#[derive(Deserialize)]
struct ChatReplyMessage {
    content: String,
}

#[derive(Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Strip a ```json fence if the model wrapped its reply in one.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

/// Parse and validate the judge's reply. The reply is untrusted: every
/// field is checked before a `Judgment` is produced.
fn parse_judgment(content: &str) -> Result<Judgment, JudgeError> {
    let judgment: Judgment = serde_json::from_str(strip_code_fence(content))
        .map_err(|e| JudgeError::MalformedReply(e.to_string()))?;

    if judgment.score > 100 {
        return Err(JudgeError::MalformedReply(format!(
            "score {} out of range",
            judgment.score
        )));
    }
    if let Some(confidence) = judgment.confidence_score {
        if confidence > 100 {
            return Err(JudgeError::MalformedReply(format!(
                "confidence {confidence} out of range"
            )));
        }
    }
    Ok(judgment)
}

#[async_trait]
impl SemanticJudge for HttpJudge {
    fn name(&self) -> &str {
        "openai"
    }

    #[instrument(skip(self, request), fields(model = %self.model, difficulty = %request.difficulty))]
    async fn judge(&self, request: &JudgeRequest) -> Result<Judgment, JudgeError> {
        let prompt = build_judgment_prompt(request);
        let content = self.chat(JUDGE_SYSTEM_PROMPT, prompt).await?;
        parse_judgment(&content)
    }
}

#[async_trait]
impl DifficultyRater for HttpJudge {
    #[instrument(skip(self, question, reference_answer), fields(model = %self.model))]
    async fn rate_difficulty(
        &self,
        question: &str,
        reference_answer: Option<&str>,
    ) -> Result<String, JudgeError> {
        let prompt = build_difficulty_prompt(question, reference_answer);
        self.chat(RATER_SYSTEM_PROMPT, prompt).await
    }
}
