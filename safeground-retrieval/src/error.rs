use safeground_core::SafegroundError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("request failed: {0}")]
    Http(String),
    #[error("Response status {0}")]
    Status(u16),
    #[error("malformed response: missing '{0}'")]
    MissingField(&'static str),
    #[error(
        "unknown attribution source '{0}' (expected one of google_vanilla, google_credible, wikipedia)"
    )]
    UnknownSource(String),
}

impl From<reqwest::Error> for RetrievalError {
    fn from(err: reqwest::Error) -> Self {
        RetrievalError::Http(err.to_string())
    }
}

impl From<RetrievalError> for SafegroundError {
    fn from(err: RetrievalError) -> Self {
        match err {
            RetrievalError::UnknownSource(_) => SafegroundError::InvalidConfig(err.to_string()),
            other => SafegroundError::Retrieval(other.to_string()),
        }
    }
}
