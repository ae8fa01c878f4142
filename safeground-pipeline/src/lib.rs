//! Phase pipeline for knowledge-augmented safety judgments.
//!
//! Five phases run over a partition of (prompt, advice) examples: Baseline,
//! Foveation, Attribution, Rationalization and Evaluation. Every phase reads
//! one collection from the [`ExampleStore`] and writes one back under a
//! [`StoreKey`] naming its coordinates, so a downstream phase fails with
//! [`SafegroundError::MissingInput`](safeground_core::SafegroundError) until
//! its upstream has run.

mod config;
mod dispatch;
mod evaluate;
mod key;
mod phases;
mod pipeline;
mod request;
mod store;

pub use config::{PipelineConfig, PipelineOptions};
pub use dispatch::dispatch;
pub use evaluate::{
    binary_entropy, expected_token, hinge, remove_zeros, EvaluationReport, Evaluator, TOLERANCE,
};
pub use key::{partition, ModelId, Phase, StoreKey, MODELS};
pub use pipeline::Pipeline;
pub use request::{PhaseRequest, MAX_SOURCES};
pub use store::{ExampleStore, DOMAIN_SHUFFLE_SEED};
