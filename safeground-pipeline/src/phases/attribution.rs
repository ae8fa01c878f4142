use std::path::PathBuf;

use safeground_core::{ErrorRecord, Example, Outcome, Runnable, SafegroundError};
use safeground_retrieval::{failure_record, AttributionSource, Attributor};

use crate::dispatch::dispatch;
use crate::key::{ModelId, Phase, StoreKey};
use crate::phases::ATTRIBUTION_TEST_KEEP;
use crate::pipeline::Retriever;
use crate::Pipeline;

impl Pipeline {
    /// Retrieves knowledge for each foveation from `source`.
    ///
    /// An unrecognised source fails before any file is read or any search
    /// issued.
    pub async fn attribution(
        &self,
        model: &ModelId,
        safe: bool,
        source: &str,
    ) -> Result<PathBuf, SafegroundError> {
        let source: AttributionSource = source.parse()?;
        let (attributor, retriever) = self.retriever(source)?;

        let examples = self.store.read_foveated(model, safe)?;
        let examples = self.limit(examples, ATTRIBUTION_TEST_KEEP);
        tracing::info!(examples = examples.len(), %source, "running attribution");

        let attributor = &attributor;
        let retriever = &retriever;
        let examples = dispatch(examples, self.config.concurrency, move |example| {
            attribute(attributor, retriever, example)
        })
        .await;

        self.store.write(
            &StoreKey::new(Phase::Attribution, model.clone(), safe).with_source(Some(source)),
            &examples,
        )
    }
}

async fn attribute(
    attributor: &Attributor,
    retriever: &Retriever,
    mut example: Example,
) -> Example {
    let outcome = match example.foveation_text() {
        Some(foveation) => {
            let query = attributor.query_for(foveation);
            let result = retriever.invoke(query.clone()).await;
            Outcome::from_result(result, |err| failure_record(&query, &err))
        }
        None => {
            tracing::warn!(prompt = %example.prompt, "no foveation to attribute");
            Outcome::Failure(ErrorRecord::new("foveation unavailable"))
        }
    };
    example.attribution = Some(outcome);
    example
}
