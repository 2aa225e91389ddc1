//! The `reponse evaluate` command.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use reponse_core::model::EvaluationRequest;
use reponse_core::ratelimit::{RateLimitConfig, RateLimiter};
use reponse_core::service::EvaluationService;
use reponse_core::tiers::TierDispatcher;
use reponse_judge::{load_config_from, HttpJudge};

pub async fn execute(
    request_path: PathBuf,
    caller: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let content = std::fs::read_to_string(&request_path)
        .with_context(|| format!("failed to read request: {}", request_path.display()))?;
    let request: EvaluationRequest = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse request: {}", request_path.display()))?;

    let judge = Arc::new(HttpJudge::new(&config.judge));
    let dispatcher = TierDispatcher::new(judge, config.bands.clone(), config.fuzzy_matching.enabled);
    let limiter = Arc::new(RateLimiter::new(RateLimitConfig {
        window: Duration::from_secs(config.rate_limit.window_secs),
        max_requests: config.rate_limit.max_requests,
    }));
    let service = EvaluationService::new(dispatcher, limiter, config.reviewer_tokens.clone());

    let result = service
        .evaluate(&caller, &request)
        .await
        .map_err(|e| anyhow::anyhow!("evaluation rejected ({}): {e}", e.status_code()))?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
