//! Error handling for the skill matcher

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SkillMatcherError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Embedding generation error: {0}")]
    Embedding(String),

    #[error("Embedding provider timed out after {0}ms")]
    EmbeddingTimeout(u64),

    #[error("Model error: {0}")]
    ModelError(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, SkillMatcherError>;

/// model2vec-rs and hf-hub surface `anyhow` errors
impl From<anyhow::Error> for SkillMatcherError {
    fn from(err: anyhow::Error) -> Self {
        SkillMatcherError::ModelError(err.to_string())
    }
}
