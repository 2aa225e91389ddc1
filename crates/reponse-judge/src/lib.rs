//! reponse-judge — Language-model judge integration.
//!
//! Implements the `SemanticJudge` and `DifficultyRater` traits over an
//! OpenAI-compatible chat endpoint, plus a scripted mock for tests and
//! the TOML configuration loader.

pub mod config;
pub mod http;
pub mod mock;
pub mod prompt;

pub use config::{load_config, load_config_from, JudgeConfig, ReponseConfig};
pub use http::HttpJudge;
pub use mock::MockJudge;
pub use reponse_core::error::JudgeError;
