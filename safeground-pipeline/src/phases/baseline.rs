use std::path::PathBuf;

use safeground_core::{Example, SafegroundError};
use safeground_llm::{CompletionClient, CompletionRequest, Prompt};
use safeground_prompt::{baseline_reasoning_prompt, chat_reasoning_prompt, FewShotContext};

use crate::dispatch::dispatch;
use crate::key::{ModelId, Phase, StoreKey};
use crate::phases::TEST_KEEP;
use crate::pipeline::complete;
use crate::Pipeline;

const MAX_TOKENS: u32 = 128;

impl Pipeline {
    /// Reasons about each raw scenario without external knowledge.
    pub async fn baseline(&self, model: &ModelId, safe: bool) -> Result<PathBuf, SafegroundError> {
        let client = self.completion_client()?;
        let num_examples = self.config.num_examples;
        let ctx = FewShotContext::new(&self.config.few_shot_dir);
        if model.is_chat() {
            ctx.chat_exemplars(num_examples)?;
        } else {
            ctx.explanation_block(num_examples)?;
        }

        let examples = self.store.read_dataset(safe, self.config.domain)?;
        let examples = self.limit(examples, TEST_KEEP);
        tracing::info!(examples = examples.len(), "running baseline");

        let client = &*client;
        let ctx = &ctx;
        let results = dispatch(examples, self.config.concurrency, move |example| {
            reason(client, ctx, model, num_examples, example)
        })
        .await;
        let examples = results.into_iter().collect::<Result<Vec<_>, _>>()?;

        self.store
            .write(&StoreKey::new(Phase::Baseline, model.clone(), safe), &examples)
    }
}

async fn reason(
    client: &dyn CompletionClient,
    ctx: &FewShotContext,
    model: &ModelId,
    num_examples: usize,
    mut example: Example,
) -> Result<Example, SafegroundError> {
    let prompt: Prompt = if model.is_chat() {
        chat_reasoning_prompt(ctx, &example.prompt, &example.advice, num_examples)?.into()
    } else {
        baseline_reasoning_prompt(ctx, &example.prompt, &example.advice, num_examples)?.into()
    };
    let request = CompletionRequest::new(prompt, model.api_name())
        .with_max_tokens(MAX_TOKENS)
        .with_stop(["."])
        .with_uncertainty(true);
    example.explanation = Some(complete(client, request).await);
    Ok(example)
}
