//! Configuration loading for the reponse toolchain.
//!
//! A single `reponse.toml` carries the judge connection settings plus
//! the tuning knobs the evaluator treats as configuration: fuzzy-tier
//! toggle, band thresholds, rate-limit window, and batch sizes.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use reponse_core::bands::BandConfig;

/// Connection settings for the external judge.
///
/// Note: Custom Debug impl masks the API key to prevent accidental
/// exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
pub struct JudgeConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl std::fmt::Debug for JudgeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JudgeConfig")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: None,
            model: default_model(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}
fn default_timeout() -> u64 {
    30
}

/// Rate-limit settings for the evaluate endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitSettings {
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
    #[serde(default = "default_max_requests")]
    pub max_requests: usize,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            window_secs: default_window_secs(),
            max_requests: default_max_requests(),
        }
    }
}

fn default_window_secs() -> u64 {
    60
}
fn default_max_requests() -> usize {
    30
}

/// Paging and concurrency settings for the batch reclassifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSettings {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            batch_size: default_batch_size(),
        }
    }
}

fn default_page_size() -> usize {
    1000
}
fn default_batch_size() -> usize {
    10
}

/// Top-level reponse configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReponseConfig {
    pub judge: JudgeConfig,
    pub fuzzy_matching: FuzzySettings,
    pub bands: BandConfig,
    pub rate_limit: RateLimitSettings,
    pub batch: BatchSettings,
    /// Identity tokens allowed to see diagnostic metadata.
    pub reviewer_tokens: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuzzySettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for FuzzySettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

fn default_true() -> bool {
    true
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `reponse.toml` in the current directory
/// 2. `~/.config/reponse/config.toml`
///
/// Environment variable override: `REPONSE_API_KEY`.
pub fn load_config() -> Result<ReponseConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<ReponseConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("reponse.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            global.exists().then_some(global)
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<ReponseConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => ReponseConfig::default(),
    };

    if let Ok(key) = std::env::var("REPONSE_API_KEY") {
        config.judge.api_key = key;
    }
    config.judge.api_key = resolve_env_vars(&config.judge.api_key);
    if let Some(url) = &config.judge.base_url {
        config.judge.base_url = Some(resolve_env_vars(url));
    }

    config
        .bands
        .validate()
        .context("invalid band thresholds in config")?;

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("reponse"))
}
