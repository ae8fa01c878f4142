use std::fmt::Display;
use std::sync::Arc;

use async_trait::async_trait;
use safeground_core::{ErrorRecord, Outcome, Runnable, SafegroundError, Snippet};

use crate::query::{clean_title, format_query};
use crate::{AbstractLookup, AttributionSource, RetrievalError, SearchHit, WebSearch};

/// Retrieves knowledge for a foveation from one configured backend.
///
/// As a [`Runnable`] it takes an already formed query (see
/// [`Attributor::query_for`]) and yields snippets in rank order.
#[derive(Clone)]
pub struct Attributor {
    source: AttributionSource,
    search: Arc<dyn WebSearch>,
    lookup: Arc<dyn AbstractLookup>,
}

impl Attributor {
    pub fn new(
        source: AttributionSource,
        search: Arc<dyn WebSearch>,
        lookup: Arc<dyn AbstractLookup>,
    ) -> Self {
        Self {
            source,
            search,
            lookup,
        }
    }

    pub fn source(&self) -> AttributionSource {
        self.source
    }

    /// Search query for a foveation, site restriction included.
    pub fn query_for(&self, foveation: &str) -> String {
        let raw = match self.source.site_restriction() {
            Some(restriction) => format!("{restriction} {foveation}"),
            None => foveation.to_string(),
        };
        format_query(raw.trim())
    }

    pub async fn retrieve(&self, query: &str) -> Result<Vec<Snippet>, RetrievalError> {
        let hits = self.search.search(query).await?;
        match self.source {
            AttributionSource::GoogleVanilla | AttributionSource::GoogleCredible => {
                Ok(hits.into_iter().filter_map(snippet_from_hit).collect())
            }
            AttributionSource::Wikipedia => Ok(self.abstracts(hits).await),
        }
    }

    /// Convenience wrapper that records failures in place of snippets.
    pub async fn attribute(&self, foveation: &str) -> Outcome<Vec<Snippet>> {
        let query = self.query_for(foveation);
        let result = self.retrieve(&query).await;
        Outcome::from_result(result, |err| failure_record(&query, &err))
    }

    async fn abstracts(&self, hits: Vec<SearchHit>) -> Vec<Snippet> {
        let mut snippets = Vec::with_capacity(hits.len());
        for hit in hits {
            let title = clean_title(&hit.title);
            match self.lookup.abstract_for(title).await {
                Ok(content) => snippets.push(Snippet {
                    source: hit.link,
                    content,
                }),
                Err(err) => tracing::warn!(error = %err, title, "dropping page without abstract"),
            }
        }
        snippets
    }
}

/// Error record for a failed retrieval, echoing the query that was sent.
pub fn failure_record(query: &str, err: &dyn Display) -> ErrorRecord {
    tracing::warn!(error = %err, query, "attribution failed");
    ErrorRecord::new(err.to_string()).with("google_query", query)
}

fn snippet_from_hit(hit: SearchHit) -> Option<Snippet> {
    let snippet = hit.snippet?;
    Some(Snippet {
        source: hit.link,
        content: format!("{}. {snippet}", hit.title),
    })
}

#[async_trait]
impl Runnable<String, Vec<Snippet>> for Attributor {
    async fn invoke(&self, query: String) -> Result<Vec<Snippet>, SafegroundError> {
        Ok(self.retrieve(&query).await?)
    }
}
