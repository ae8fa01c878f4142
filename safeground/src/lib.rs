//! Knowledge-augmented safety judgments with language models.
//!
//! Re-exports the workspace crates under one name:
//!
//! * [`core`]: examples, outcomes, errors and the [`Runnable`](core::Runnable) seam
//! * [`prompt`]: scenario and few-shot prompt construction
//! * [`llm`]: OpenAI-compatible completion client and tokenizer
//! * [`retrieval`]: web search and encyclopedia backends
//! * [`pipeline`]: the phase pipeline, example store and evaluator

pub use safeground_core as core;
pub use safeground_llm as llm;
pub use safeground_pipeline as pipeline;
pub use safeground_prompt as prompt;
pub use safeground_retrieval as retrieval;

pub mod prelude {
    pub use safeground_core::{
        Candidate, Domain, ErrorRecord, Example, Outcome, Runnable, SafegroundError, Snippet,
    };
    pub use safeground_llm::{CompletionClient, CompletionRequest, OpenAiCompletionClient};
    pub use safeground_pipeline::{
        EvaluationReport, ExampleStore, ModelId, Phase, PhaseRequest, Pipeline, PipelineConfig,
        StoreKey,
    };
    pub use safeground_retrieval::{AttributionSource, SerpApiClient, WikipediaClient};
}
