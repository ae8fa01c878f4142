use std::fmt;
use std::str::FromStr;

use safeground_core::SafegroundError;
use safeground_retrieval::AttributionSource;

/// Model identifiers accepted on the command line.
pub const MODELS: [&str; 6] = [
    "gpt_ada-001",
    "gpt_babbage-001",
    "gpt_curie-001",
    "gpt_davinci-002",
    "gpt_davinci-003",
    "chat_turbo",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    Baseline,
    Foveation,
    Attribution,
    Rationalization,
    Evaluation,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Baseline => "baseline",
            Phase::Foveation => "foveation",
            Phase::Attribution => "attribution",
            Phase::Rationalization => "rationalization",
            Phase::Evaluation => "evaluation",
        }
    }

    /// Phase for its driver index, `0..=4`.
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Phase::Baseline),
            1 => Some(Phase::Foveation),
            2 => Some(Phase::Attribution),
            3 => Some(Phase::Rationalization),
            4 => Some(Phase::Evaluation),
            _ => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Model identity split into class and variant: `gpt_davinci-003` is class
/// `gpt`, variant `davinci-003`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ModelId {
    class: String,
    variant: String,
}

impl ModelId {
    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn variant(&self) -> &str {
        &self.variant
    }

    pub fn is_chat(&self) -> bool {
        self.class == "chat"
    }

    /// Name sent to the completion endpoint.
    pub fn api_name(&self) -> String {
        if self.is_chat() {
            "gpt-3.5-turbo".to_string()
        } else {
            format!("text-{}", self.variant)
        }
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.class, self.variant)
    }
}

impl FromStr for ModelId {
    type Err = SafegroundError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if !MODELS.contains(&value) {
            return Err(SafegroundError::InvalidConfig(format!(
                "unknown model '{value}' (expected one of {})",
                MODELS.join(", ")
            )));
        }
        let (class, variant) = value
            .split_once('_')
            .ok_or_else(|| SafegroundError::InvalidConfig(format!("malformed model '{value}'")))?;
        Ok(Self {
            class: class.to_string(),
            variant: variant.to_string(),
        })
    }
}

/// Pipeline coordinates of one persisted collection.
///
/// The file stem is a pure function of the key, so whether a phase has run
/// for some coordinates is answered by whether its file exists.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StoreKey {
    pub phase: Phase,
    pub model: ModelId,
    pub safe: bool,
    pub num_sources: Option<usize>,
    pub attribution_source: Option<AttributionSource>,
    pub baseline: bool,
}

impl StoreKey {
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

    pub fn with_source(mut self, source: Option<AttributionSource>) -> Self {
        self.attribution_source = source;
        self
    }

    pub fn with_baseline(mut self, baseline: bool) -> Self {
        self.baseline = baseline;
        self
    }

    pub fn file_stem(&self) -> String {
        let mut stem = format!(
            "{}_{}_{}_{}",
            self.phase,
            self.model.class(),
            self.model.variant(),
            partition(self.safe)
        );
        // A zero source count never names a file.
        if let Some(num_sources) = self.num_sources.filter(|n| *n > 0) {
            stem.push_str(&format!("_snippet{num_sources}"));
        }
        if let Some(source) = self.attribution_source {
            stem.push('_');
            stem.push_str(source.as_str());
        }
        if self.baseline {
            stem.push_str("_baseline");
        }
        stem
    }
}

pub fn partition(safe: bool) -> &'static str {
    if safe {
        "safe"
    } else {
        "unsafe"
    }
}
