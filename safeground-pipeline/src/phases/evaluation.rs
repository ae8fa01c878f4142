use std::path::PathBuf;

use safeground_core::SafegroundError;
use safeground_retrieval::AttributionSource;

use crate::evaluate::{EvaluationReport, Evaluator};
use crate::key::{ModelId, Phase, StoreKey};
use crate::Pipeline;

impl Pipeline {
    /// Scores the rationalized (or, with `baseline`, the baseline) collection
    /// and writes the report next to it.
    pub async fn evaluation(
        &self,
        model: &ModelId,
        safe: bool,
        num_sources: Option<usize>,
        source: Option<AttributionSource>,
        baseline: bool,
    ) -> Result<(PathBuf, EvaluationReport), SafegroundError> {
        let evaluator = Evaluator::new(self.token_counter()?);
        let examples = self
            .store
            .read_rationalized(model, safe, num_sources, source, baseline)?;

        let report = evaluator.evaluate(&examples, safe)?;
        tracing::info!(
            examples = examples.len(),
            accuracy = report.accuracy,
            "evaluated"
        );

        let key = StoreKey::new(Phase::Evaluation, model.clone(), safe)
            .with_num_sources(num_sources)
            .with_source(source)
            .with_baseline(baseline);
        let path = self.store.write(&key, &report)?;
        Ok((path, report))
    }
}
