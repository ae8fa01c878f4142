use std::path::PathBuf;

use safeground_core::{Example, SafegroundError};
use safeground_llm::{CompletionClient, CompletionRequest};
use safeground_prompt::{context_prompt, FewShotContext};

use crate::dispatch::dispatch;
use crate::key::{ModelId, Phase, StoreKey};
use crate::phases::TEST_KEEP;
use crate::pipeline::complete;
use crate::Pipeline;

const MAX_TOKENS: u32 = 256;

impl Pipeline {
    /// Asks, few-shot, which knowledge each scenario needs.
    pub async fn foveation(&self, model: &ModelId, safe: bool) -> Result<PathBuf, SafegroundError> {
        let client = self.completion_client()?;
        let ctx = FewShotContext::new(&self.config.few_shot_dir);
        ctx.foveation_block()?;

        let examples = self.store.read_dataset(safe, self.config.domain)?;
        let examples = self.limit(examples, TEST_KEEP);
        tracing::info!(examples = examples.len(), "running foveation");

        let client = &*client;
        let ctx = &ctx;
        let model_name = model.api_name();
        let model_name = model_name.as_str();
        let results = dispatch(examples, self.config.concurrency, move |example| {
            foveate(client, ctx, model_name, example)
        })
        .await;
        let examples = results.into_iter().collect::<Result<Vec<_>, _>>()?;

        self.store
            .write(&StoreKey::new(Phase::Foveation, model.clone(), safe), &examples)
    }
}

async fn foveate(
    client: &dyn CompletionClient,
    ctx: &FewShotContext,
    model: &str,
    mut example: Example,
) -> Result<Example, SafegroundError> {
    let prompt = context_prompt(ctx, &example.prompt, &example.advice, true)?;
    let request = CompletionRequest::new(prompt, model)
        .with_max_tokens(MAX_TOKENS)
        .with_stop(["Q:", "A:"])
        .with_uncertainty(true);

    let mut foveation = complete(client, request).await;
    if let Some(candidate) = foveation.first_candidate_mut() {
        candidate.completion = clean_foveation(&candidate.completion);
    }
    example.foveation = Some(foveation);
    Ok(example)
}

/// Drops embedded newlines and surrounding spaces.
pub(crate) fn clean_foveation(text: &str) -> String {
    text.replace('\n', "").trim_matches(' ').to_string()
}
