use std::{path::PathBuf, time::Duration};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SafegroundError {
    #[error("LLM provider failed: {0}")]
    LlmProvider(String),
    #[error("Retrieval failed: {0}")]
    Retrieval(String),
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Missing input '{}': run the upstream phase first", path.display())]
    MissingInput { path: PathBuf },
    #[error("Few-shot examples unavailable at '{}': {reason}", path.display())]
    FewShot { path: PathBuf, reason: String },
    #[error("Evaluation failed: {0}")]
    Evaluation(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization/deserialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("{0}")]
    Custom(String),
}
