use std::path::PathBuf;
use std::time::Duration;

use safeground_core::Domain;

#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Examples in flight at once; 1 processes them strictly in sequence.
    pub concurrency: usize,
    /// Deadline for each external call.
    pub call_timeout: Option<Duration>,
    /// Dry run on the first example (first two for attribution).
    pub test: bool,
    /// Exemplars in the reasoning few-shot blocks.
    pub num_examples: usize,
    pub domain: Option<Domain>,
    pub few_shot_dir: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            concurrency: 1,
            call_timeout: None,
            test: false,
            num_examples: 16,
            domain: None,
            few_shot_dir: PathBuf::from("./data/few_shot"),
        }
    }
}

impl PipelineConfig {
    pub fn merge(&self, overrides: &PipelineOptions) -> Self {
        Self {
            concurrency: overrides.concurrency.unwrap_or(self.concurrency).max(1),
            call_timeout: overrides.call_timeout.or(self.call_timeout),
            test: overrides.test.unwrap_or(self.test),
            num_examples: overrides.num_examples.unwrap_or(self.num_examples),
            domain: overrides.domain.or(self.domain),
            few_shot_dir: overrides
                .few_shot_dir
                .clone()
                .unwrap_or_else(|| self.few_shot_dir.clone()),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct PipelineOptions {
    pub concurrency: Option<usize>,
    pub call_timeout: Option<Duration>,
    pub test: Option<bool>,
    pub num_examples: Option<usize>,
    pub domain: Option<Domain>,
    pub few_shot_dir: Option<PathBuf>,
}
