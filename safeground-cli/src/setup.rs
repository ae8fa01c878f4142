use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use safeground::core::SafegroundError;
use safeground::llm::{HfTokenCounter, OpenAiCompletionClient};
use safeground::pipeline::{ExampleStore, Phase, Pipeline, PipelineConfig};
use safeground::retrieval::{SerpApiClient, WikipediaClient};

use crate::Cli;

/// Builds a pipeline with only the collaborators `phase` calls, so an
/// evaluation run needs no API keys.
pub fn build_pipeline(cli: &Cli, phase: Phase) -> Result<Pipeline, SafegroundError> {
    let config = PipelineConfig::default().merge(&cli.options());
    let store = ExampleStore::new(&cli.data_dir, cli.folder.clone());
    let pipeline = Pipeline::new(store, config);

    match phase {
        Phase::Baseline | Phase::Foveation | Phase::Rationalization => {
            let mut builder =
                OpenAiCompletionClient::builder().api_key(required("OPENAI_API_KEY")?);
            if let Ok(base_url) = env::var("OPENAI_BASE_URL") {
                builder = builder.base_url(&base_url)?;
            }
            Ok(pipeline.with_completion(Arc::new(builder.build()?)))
        }
        Phase::Attribution => {
            let search = SerpApiClient::new(required("SERP_API_KEY")?)?;
            let lookup = WikipediaClient::new()?;
            Ok(pipeline.with_retrieval(Arc::new(search), Arc::new(lookup)))
        }
        Phase::Evaluation => {
            let path = env::var("SAFEGROUND_TOKENIZER")
                .map(PathBuf::from)
                .unwrap_or_else(|_| cli.data_dir.join("gpt2").join("tokenizer.json"));
            let tokens = HfTokenCounter::from_file(path)?;
            Ok(pipeline.with_token_counter(Arc::new(tokens)))
        }
    }
}

fn required(name: &str) -> Result<String, SafegroundError> {
    env::var(name).map_err(|_| SafegroundError::InvalidConfig(format!("{name} must be set")))
}
