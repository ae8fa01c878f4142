use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::RetrievalError;

/// One organic search result, in rank order.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct SearchHit {
    pub link: String,
    pub title: String,
    #[serde(default)]
    pub snippet: Option<String>,
}

/// Front-page web search.
#[async_trait]
pub trait WebSearch: Send + Sync {
    /// Returns organic results for `query`, most relevant first.
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, RetrievalError>;
}

/// Encyclopedia abstract lookup by page title.
#[async_trait]
pub trait AbstractLookup: Send + Sync {
    async fn abstract_for(&self, title: &str) -> Result<String, RetrievalError>;
}
