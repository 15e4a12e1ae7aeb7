use thiserror::Error;

use crate::config::ConfigError;
use crate::llm_client::LlmError;
use crate::sources::SourceError;

/// Application-level error type. Module errors convert into it with `?`;
/// `main` turns it into an `anyhow::Error` with context.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
