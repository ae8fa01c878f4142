use std::path::PathBuf;

use safeground_core::SafegroundError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("no snippets available to augment")]
    NoSnippets,
    #[error("no attribution attached to example")]
    MissingAttribution,
    #[error("attribution failed: {0}")]
    AttributionFailed(String),
    #[error("few-shot file '{}' unreadable: {reason}", path.display())]
    FewShotUnavailable { path: PathBuf, reason: String },
    #[error("few-shot file '{}' has {available} exemplars, {wanted} requested", path.display())]
    NotEnoughExemplars {
        path: PathBuf,
        wanted: usize,
        available: usize,
    },
    #[error("few-shot exemplar {index} in '{}' lacks a usable {field}", path.display())]
    MalformedExemplar {
        path: PathBuf,
        index: usize,
        field: &'static str,
    },
}

impl From<PromptError> for SafegroundError {
    fn from(err: PromptError) -> Self {
        match err {
            PromptError::FewShotUnavailable { ref path, .. }
            | PromptError::NotEnoughExemplars { ref path, .. }
            | PromptError::MalformedExemplar { ref path, .. } => SafegroundError::FewShot {
                path: path.clone(),
                reason: err.to_string(),
            },
            other => SafegroundError::Custom(other.to_string()),
        }
    }
}
