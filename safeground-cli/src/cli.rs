use std::path::PathBuf;
use std::time::Duration;

use clap::builder::PossibleValuesParser;
use clap::{Parser, ValueEnum};
use safeground::core::{Domain, SafegroundError};
use safeground::pipeline::{ModelId, Phase, PhaseRequest, PipelineOptions, MODELS};
use safeground::retrieval::AttributionSource;

#[derive(Parser, Debug)]
#[command(name = "safeground")]
#[command(version, about = "Knowledge-augmented safety judgments, one phase at a time")]
pub struct Cli {
    /// Folder under the data directory holding this run's files
    #[arg(short, long)]
    pub folder: String,

    /// 0 baseline, 1 foveation, 2 attribution, 3 rationalization, 4 evaluation
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=4))]
    pub phase: u8,

    /// Which partition(s) to process; `all` runs unsafe then safe
    #[arg(short = 't', long = "type", value_enum)]
    pub partition: PartitionArg,

    #[arg(short, long, value_parser = PossibleValuesParser::new(MODELS))]
    pub model: String,

    /// Snippets used as context when rationalizing
    #[arg(short = 's', long, value_parser = clap::value_parser!(u8).range(1..=9))]
    pub num_sources: Option<u8>,

    #[arg(short, long, value_parser = attribution_sources())]
    pub attribution_source: Option<String>,

    /// Few-shot exemplars in reasoning prompts
    #[arg(
        short = 'e',
        long,
        default_value_t = 16,
        value_parser = clap::value_parser!(u8).range(0..=16)
    )]
    pub num_examples: u8,

    /// Restrict the raw dataset to one domain
    #[arg(short, long, value_enum, default_value_t = DomainArg::All)]
    pub domain: DomainArg,

    /// Process only the first example (two for attribution)
    #[arg(long)]
    pub test: bool,

    /// Evaluate the baseline files instead of the rationalized ones
    #[arg(long)]
    pub baseline: bool,

    #[arg(long, env = "SAFEGROUND_DATA_DIR", default_value = "./data")]
    pub data_dir: PathBuf,

    /// Defaults to `<data-dir>/few_shot`
    #[arg(long)]
    pub few_shot_dir: Option<PathBuf>,

    /// Examples processed concurrently
    #[arg(long, default_value_t = 1)]
    pub concurrency: usize,

    /// Per-call deadline for completion and retrieval requests
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PartitionArg {
    Safe,
    Unsafe,
    All,
}

impl PartitionArg {
    /// Safety labels to run, in order.
    pub fn labels(self) -> &'static [bool] {
        match self {
            PartitionArg::Safe => &[true],
            PartitionArg::Unsafe => &[false],
            PartitionArg::All => &[false, true],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DomainArg {
    Nature,
    Household,
    Medical,
    Other,
    All,
}

impl DomainArg {
    pub fn filter(self) -> Option<Domain> {
        match self {
            DomainArg::Nature => Some(Domain::Nature),
            DomainArg::Household => Some(Domain::Household),
            DomainArg::Medical => Some(Domain::Medical),
            DomainArg::Other => Some(Domain::Other),
            DomainArg::All => None,
        }
    }
}

impl Cli {
    pub fn phase(&self) -> Result<Phase, SafegroundError> {
        Phase::from_index(self.phase).ok_or_else(|| {
            SafegroundError::InvalidConfig(format!("phase must be 0-4, got {}", self.phase))
        })
    }

    /// One validated request per partition; any invalid combination fails
    /// here, before a single example is touched.
    pub fn requests(&self) -> Result<Vec<PhaseRequest>, SafegroundError> {
        let phase = self.phase()?;
        let model: ModelId = self.model.parse()?;
        self.partition
            .labels()
            .iter()
            .map(|&safe| {
                let request = PhaseRequest::new(phase, model.clone(), safe)
                    .with_num_sources(self.num_sources.map(usize::from))
                    .with_attribution_source(self.attribution_source.clone())
                    .with_baseline(self.baseline);
                request.validate()?;
                Ok(request)
            })
            .collect()
    }

    pub fn options(&self) -> PipelineOptions {
        PipelineOptions {
            concurrency: Some(self.concurrency),
            call_timeout: self.timeout_secs.map(Duration::from_secs),
            test: Some(self.test),
            num_examples: Some(usize::from(self.num_examples)),
            domain: self.domain.filter(),
            few_shot_dir: Some(
                self.few_shot_dir
                    .clone()
                    .unwrap_or_else(|| self.data_dir.join("few_shot")),
            ),
        }
    }
}

fn attribution_sources() -> PossibleValuesParser {
    PossibleValuesParser::new(AttributionSource::ALL.map(|source| source.as_str()))
}
