#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use safeground_core::{Candidate, Example, Runnable, SafegroundError};
use safeground_llm::{Completion, CompletionRequest, TokenCounter};
use safeground_pipeline::{ExampleStore, Pipeline, PipelineConfig};
use safeground_retrieval::{AbstractLookup, RetrievalError, SearchHit, WebSearch};

pub fn candidate(completion: &str, log_probability: f64, dist: &[(&str, f64)]) -> Candidate {
    Candidate {
        completion: completion.to_string(),
        log_probability,
        first_token_distribution: dist
            .iter()
            .map(|(token, lp)| (token.to_string(), *lp))
            .collect::<BTreeMap<_, _>>(),
    }
}

pub fn beach() -> Example {
    Example::new("You are at the beach", "swim during a storm")
        .with_domain(safeground_core::Domain::Nature)
}

pub fn write_dataset(data_root: &Path, safe: bool, examples: &[Example]) {
    let dir = data_root.join("safetext");
    std::fs::create_dir_all(&dir).unwrap();
    let name = if safe { "safe_samples.json" } else { "unsafe_samples.json" };
    std::fs::write(dir.join(name), serde_json::to_string(examples).unwrap()).unwrap();
}

pub fn pipeline(data_root: &Path, config: PipelineConfig) -> Pipeline {
    Pipeline::new(ExampleStore::new(data_root, "run"), config)
}

pub fn zero_shot() -> PipelineConfig {
    PipelineConfig {
        num_examples: 0,
        ..PipelineConfig::default()
    }
}

pub struct StubCompletion {
    reply: Result<Vec<Candidate>, String>,
    delay: Option<Duration>,
    pub requests: Mutex<Vec<CompletionRequest>>,
}

impl StubCompletion {
    pub fn replying(candidates: Vec<Candidate>) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(candidates),
            delay: None,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(message.to_string()),
            delay: None,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn slow(candidates: Vec<Candidate>, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(candidates),
            delay: Some(delay),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Runnable<CompletionRequest, Completion> for StubCompletion {
    async fn invoke(&self, request: CompletionRequest) -> Result<Completion, SafegroundError> {
        self.requests.lock().unwrap().push(request);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.reply {
            Ok(candidates) => Ok(Completion::Scored(candidates.clone())),
            Err(message) => Err(SafegroundError::LlmProvider(message.clone())),
        }
    }
}

#[derive(Default)]
pub struct CountingSearch {
    pub hits: Vec<SearchHit>,
    pub fail: bool,
    pub calls: AtomicUsize,
}

impl CountingSearch {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WebSearch for CountingSearch {
    async fn search(&self, _query: &str) -> Result<Vec<SearchHit>, RetrievalError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(RetrievalError::Status(500));
        }
        Ok(self.hits.clone())
    }
}

#[derive(Default)]
pub struct CountingLookup {
    pub calls: AtomicUsize,
}

#[async_trait]
impl AbstractLookup for CountingLookup {
    async fn abstract_for(&self, title: &str) -> Result<String, RetrievalError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("{title} abstract"))
    }
}

/// Counts whitespace-separated words.
pub struct WordCounter;

impl TokenCounter for WordCounter {
    fn count_tokens(&self, text: &str) -> Result<usize, SafegroundError> {
        Ok(text.split_whitespace().count())
    }
}
