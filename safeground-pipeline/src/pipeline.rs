use std::path::PathBuf;
use std::sync::Arc;

use safeground_core::{Candidate, Example, Outcome, Runnable, SafegroundError, Snippet, Timed};
use safeground_llm::{Completion, CompletionClient, CompletionRequest, TokenCounter};
use safeground_retrieval::{AbstractLookup, AttributionSource, Attributor, WebSearch};
use tracing::Instrument;

use crate::key::{partition, Phase};
use crate::{ExampleStore, PhaseRequest, PipelineConfig};

pub(crate) type Retriever = Arc<dyn Runnable<String, Vec<Snippet>> + Send + Sync>;

/// Runs phases against one [`ExampleStore`].
///
/// Collaborators are attached with the `with_*` methods; a phase that needs
/// one that is missing fails before touching any example.
pub struct Pipeline {
    pub(crate) store: ExampleStore,
    pub(crate) config: PipelineConfig,
    completion: Option<Arc<dyn CompletionClient>>,
    search: Option<Arc<dyn WebSearch>>,
    lookup: Option<Arc<dyn AbstractLookup>>,
    tokens: Option<Arc<dyn TokenCounter>>,
}

impl Pipeline {
    pub fn new(store: ExampleStore, config: PipelineConfig) -> Self {
        Self {
            store,
            config,
            completion: None,
            search: None,
            lookup: None,
            tokens: None,
        }
    }

    pub fn with_completion(mut self, client: Arc<dyn CompletionClient>) -> Self {
        self.completion = Some(client);
        self
    }

    pub fn with_retrieval(
        mut self,
        search: Arc<dyn WebSearch>,
        lookup: Arc<dyn AbstractLookup>,
    ) -> Self {
        self.search = Some(search);
        self.lookup = Some(lookup);
        self
    }

    pub fn with_token_counter(mut self, tokens: Arc<dyn TokenCounter>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    pub fn store(&self) -> &ExampleStore {
        &self.store
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Validates `request` and runs its phase, returning the written file.
    pub async fn run(&self, request: &PhaseRequest) -> Result<PathBuf, SafegroundError> {
        request.validate()?;
        let span = tracing::info_span!(
            "phase",
            phase = %request.phase,
            model = %request.model,
            partition = partition(request.safe),
        );

        self.run_phase(request).instrument(span).await
    }

    async fn run_phase(&self, request: &PhaseRequest) -> Result<PathBuf, SafegroundError> {
        let source = request.source()?;
        match request.phase {
            Phase::Baseline => self.baseline(&request.model, request.safe).await,
            Phase::Foveation => self.foveation(&request.model, request.safe).await,
            Phase::Attribution => {
                let source = source.ok_or_else(|| {
                    SafegroundError::InvalidConfig(
                        "attribution requires an attribution source".to_string(),
                    )
                })?;
                self.attribution(&request.model, request.safe, source.as_str())
                    .await
            }
            Phase::Rationalization => {
                let (num_sources, source) = request.num_sources.zip(source).ok_or_else(|| {
                    SafegroundError::InvalidConfig(
                        "rationalization requires num_sources and an attribution source"
                            .to_string(),
                    )
                })?;
                self.rationalization(
                    &request.model,
                    request.safe,
                    num_sources,
                    source.as_str(),
                )
                .await
            }
            Phase::Evaluation => self
                .evaluation(
                    &request.model,
                    request.safe,
                    request.num_sources,
                    source,
                    request.baseline,
                )
                .await
                .map(|(path, _)| path),
        }
    }

    /// Keeps the first `keep` examples in test mode.
    pub(crate) fn limit(&self, mut examples: Vec<Example>, keep: usize) -> Vec<Example> {
        if self.config.test {
            examples.truncate(keep);
        }
        examples
    }

    pub(crate) fn completion_client(&self) -> Result<Arc<dyn CompletionClient>, SafegroundError> {
        let client = self.completion.clone().ok_or_else(|| {
            SafegroundError::InvalidConfig("no completion client configured".to_string())
        })?;
        let client: Arc<dyn CompletionClient> = match self.config.call_timeout {
            Some(limit) => Arc::new(Timed::new(client, limit)),
            None => client,
        };
        Ok(client)
    }

    pub(crate) fn retriever(
        &self,
        source: AttributionSource,
    ) -> Result<(Attributor, Retriever), SafegroundError> {
        let (search, lookup) = self
            .search
            .clone()
            .zip(self.lookup.clone())
            .ok_or_else(|| {
                SafegroundError::InvalidConfig("no retrieval backends configured".to_string())
            })?;
        let attributor = Attributor::new(source, search, lookup);
        let retriever: Retriever = match self.config.call_timeout {
            Some(limit) => Arc::new(Timed::new(attributor.clone(), limit)),
            None => Arc::new(attributor.clone()),
        };
        Ok((attributor, retriever))
    }

    pub(crate) fn token_counter(&self) -> Result<Arc<dyn TokenCounter>, SafegroundError> {
        self.tokens.clone().ok_or_else(|| {
            SafegroundError::InvalidConfig("no tokenizer configured".to_string())
        })
    }
}

/// One completion call, with failures recorded in place of the candidates.
pub(crate) async fn complete(
    client: &dyn CompletionClient,
    request: CompletionRequest,
) -> Outcome<Vec<Candidate>> {
    let result = client
        .invoke(request.clone())
        .await
        .and_then(Completion::into_candidates);
    Outcome::from_result(result, |err| {
        tracing::warn!(error = %err, model = %request.model, "completion failed");
        request.error_record(&err)
    })
}
