use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::{AbstractLookup, RetrievalError};

pub const WIKIPEDIA_BASE_URL: &str = "https://en.wikipedia.org";

/// Intro-section plain-text extracts from the MediaWiki query API.
#[derive(Clone)]
pub struct WikipediaClient {
    base_url: String,
    http: Client,
}

impl WikipediaClient {
    pub fn new() -> Result<Self, RetrievalError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("safeground/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            base_url: WIKIPEDIA_BASE_URL.to_string(),
            http,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl AbstractLookup for WikipediaClient {
    async fn abstract_for(&self, title: &str) -> Result<String, RetrievalError> {
        let url = format!("{}/w/api.php", self.base_url.trim_end_matches('/'));
        let response: Value = self
            .http
            .get(url)
            .query(&[
                ("action", "query"),
                ("format", "json"),
                ("prop", "extracts"),
                ("exintro", "1"),
                ("explaintext", "1"),
                ("titles", title),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(warnings) = response.get("warnings") {
            tracing::warn!(title, %warnings, "wikipedia returned warnings");
        }

        response
            .get("query")
            .and_then(|query| query.get("pages"))
            .and_then(Value::as_object)
            .and_then(|pages| pages.values().next())
            .and_then(|page| page.get("extract"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or(RetrievalError::MissingField("query.pages.extract"))
    }
}
