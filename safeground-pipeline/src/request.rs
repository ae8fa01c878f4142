use safeground_core::SafegroundError;
use safeground_retrieval::AttributionSource;

use crate::key::{ModelId, Phase};

/// Highest source count a rationalization may augment with.
pub const MAX_SOURCES: usize = 9;

/// One phase invocation for one partition.
///
/// The attribution source stays a raw string until [`PhaseRequest::validate`]
/// or the phase itself resolves it, so a bad name fails before any work.
#[derive(Clone, Debug)]
pub struct PhaseRequest {
    pub phase: Phase,
    pub model: ModelId,
    pub safe: bool,
    pub num_sources: Option<usize>,
    pub attribution_source: Option<String>,
    pub baseline: bool,
}

impl PhaseRequest {
    pub fn new(phase: Phase, model: ModelId, safe: bool) -> Self {
        Self {
            phase,
            model,
            safe,
            num_sources: None,
            attribution_source: None,
            baseline: false,
        }
    }

    pub fn with_num_sources(mut self, num_sources: Option<usize>) -> Self {
        self.num_sources = num_sources;
        self
    }

    pub fn with_attribution_source(mut self, source: Option<String>) -> Self {
        self.attribution_source = source;
        self
    }

    pub fn with_baseline(mut self, baseline: bool) -> Self {
        self.baseline = baseline;
        self
    }

    /// Rejects coordinate combinations the phase cannot run with.
    pub fn validate(&self) -> Result<(), SafegroundError> {
        let source = self.source()?;
        if let Some(n) = self.num_sources {
            if !(1..=MAX_SOURCES).contains(&n) {
                return Err(invalid(format!(
                    "num_sources must be between 1 and {MAX_SOURCES}, got {n}"
                )));
            }
        }

        match self.phase {
            Phase::Baseline | Phase::Evaluation => Ok(()),
            Phase::Foveation if self.model.is_chat() => Err(chat_unsupported(self.phase)),
            Phase::Foveation => Ok(()),
            Phase::Attribution => source.map(|_| ()).ok_or_else(missing_source),
            Phase::Rationalization => {
                if self.model.is_chat() {
                    return Err(chat_unsupported(self.phase));
                }
                if self.num_sources.is_none() {
                    return Err(invalid(
                        "rationalization requires num_sources".to_string(),
                    ));
                }
                source.map(|_| ()).ok_or_else(missing_source)
            }
        }
    }

    /// The parsed attribution source, if one was given.
    pub fn source(&self) -> Result<Option<AttributionSource>, SafegroundError> {
        self.attribution_source
            .as_deref()
            .map(str::parse::<AttributionSource>)
            .transpose()
            .map_err(SafegroundError::from)
    }
}

fn invalid(message: String) -> SafegroundError {
    SafegroundError::InvalidConfig(message)
}

fn missing_source() -> SafegroundError {
    invalid(format!(
        "attribution_source must be one of {}",
        AttributionSource::ALL.map(|source| source.as_str()).join(", ")
    ))
}

fn chat_unsupported(phase: Phase) -> SafegroundError {
    invalid(format!("chat models only run the baseline phase, not {phase}"))
}
