use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::{RetrievalError, SearchHit, WebSearch};

pub const SERP_BASE_URL: &str = "https://serpapi.com";

/// Google front-page results through SerpAPI.
#[derive(Clone)]
pub struct SerpApiClient {
    base_url: String,
    api_key: SecretString,
    http: Client,
}

impl SerpApiClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, RetrievalError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Self {
            base_url: SERP_BASE_URL.to_string(),
            api_key: SecretString::new(api_key.into()),
            http,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Debug, Deserialize)]
struct SerpResponse {
    organic_results: Option<Vec<SearchHit>>,
}

#[async_trait]
impl WebSearch for SerpApiClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, RetrievalError> {
        tracing::debug!(query, "querying serpapi");
        let url = format!("{}/search", self.base_url.trim_end_matches('/'));
        let response = self
            .http
            .get(url)
            .query(&[
                ("engine", "google"),
                ("location", "United States"),
                ("hl", "en"),
                ("gl", "us"),
                ("q", query),
                ("api_key", self.api_key.expose_secret().as_str()),
            ])
            .send()
            .await?;

        if response.status().as_u16() != 200 {
            return Err(RetrievalError::Status(response.status().as_u16()));
        }

        let body: SerpResponse = response.json().await?;
        body.organic_results
            .ok_or(RetrievalError::MissingField("organic_results"))
    }
}
