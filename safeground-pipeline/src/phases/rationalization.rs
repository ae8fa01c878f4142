use std::path::PathBuf;

use safeground_core::{Example, SafegroundError};
use safeground_llm::{CompletionClient, CompletionRequest};
use safeground_prompt::{attribution_context, contextualized_reasoning_prompt, FewShotContext};
use safeground_retrieval::AttributionSource;

use crate::dispatch::dispatch;
use crate::key::{ModelId, Phase, StoreKey};
use crate::phases::TEST_KEEP;
use crate::pipeline::complete;
use crate::Pipeline;

const MAX_TOKENS: u32 = 128;

#[derive(Clone, Copy)]
struct Widths {
    num_sources: usize,
    num_examples: usize,
}

impl Pipeline {
    /// Reasons about each scenario with its top `num_sources` snippets as
    /// context.
    pub async fn rationalization(
        &self,
        model: &ModelId,
        safe: bool,
        num_sources: usize,
        source: &str,
    ) -> Result<PathBuf, SafegroundError> {
        let source: AttributionSource = source.parse()?;
        let client = self.completion_client()?;
        let widths = Widths {
            num_sources,
            num_examples: self.config.num_examples,
        };
        let ctx = FewShotContext::new(&self.config.few_shot_dir);
        ctx.augmented_block(widths.num_examples, widths.num_sources)?;

        let examples = self.store.read_attributed(model, safe, source)?;
        let examples = self.limit(examples, TEST_KEEP);
        tracing::info!(examples = examples.len(), num_sources, %source, "running rationalization");

        let client = &*client;
        let ctx = &ctx;
        let model_name = model.api_name();
        let model_name = model_name.as_str();
        let results = dispatch(examples, self.config.concurrency, move |example| {
            rationalize(client, ctx, model_name, widths, example)
        })
        .await;
        let examples = results.into_iter().collect::<Result<Vec<_>, _>>()?;

        self.store.write(
            &StoreKey::new(Phase::Rationalization, model.clone(), safe)
                .with_num_sources(Some(num_sources))
                .with_source(Some(source)),
            &examples,
        )
    }
}

async fn rationalize(
    client: &dyn CompletionClient,
    ctx: &FewShotContext,
    model: &str,
    widths: Widths,
    mut example: Example,
) -> Result<Example, SafegroundError> {
    // A context that cannot be built is replaced by its error message.
    let context = attribution_context(example.attribution.as_ref(), widths.num_sources)
        .unwrap_or_else(|err| {
            tracing::warn!(error = %err, prompt = %example.prompt, "context unavailable");
            err.to_string()
        });

    let prompt = contextualized_reasoning_prompt(
        ctx,
        &example.prompt,
        &example.advice,
        &context,
        widths.num_sources,
        widths.num_examples,
    )?;
    let request = CompletionRequest::new(prompt, model)
        .with_max_tokens(MAX_TOKENS)
        .with_uncertainty(true);

    example.context = Some(context);
    example.explanation = Some(complete(client, request).await);
    Ok(example)
}
