use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use safeground_core::{Domain, Example, SafegroundError};
use safeground_retrieval::AttributionSource;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::key::{partition, ModelId, Phase, StoreKey};

/// Seed for shuffling domain-filtered datasets.
pub const DOMAIN_SHUFFLE_SEED: u64 = 69;

/// Whole-collection JSON storage under `{data_root}/{folder}`.
#[derive(Clone, Debug)]
pub struct ExampleStore {
    data_root: PathBuf,
    folder: String,
    dataset_root: PathBuf,
}

impl ExampleStore {
    pub fn new(data_root: impl AsRef<Path>, folder: impl Into<String>) -> Self {
        let data_root = data_root.as_ref().to_path_buf();
        Self {
            dataset_root: data_root.join("safetext"),
            data_root,
            folder: folder.into(),
        }
    }

    pub fn with_dataset_root(mut self, dataset_root: impl AsRef<Path>) -> Self {
        self.dataset_root = dataset_root.as_ref().to_path_buf();
        self
    }

    pub fn path_for(&self, key: &StoreKey) -> PathBuf {
        self.data_root
            .join(&self.folder)
            .join(format!("{}.json", key.file_stem()))
    }

    pub fn dataset_path(&self, safe: bool) -> PathBuf {
        self.dataset_root
            .join(format!("{}_samples.json", partition(safe)))
    }

    /// Raw scenarios for one partition.
    ///
    /// With a domain filter only that domain's examples are kept, in a
    /// shuffled but reproducible order.
    pub fn read_dataset(
        &self,
        safe: bool,
        domain: Option<Domain>,
    ) -> Result<Vec<Example>, SafegroundError> {
        let mut examples: Vec<Example> = read_json(&self.dataset_path(safe))?;
        if let Some(domain) = domain {
            examples.retain(|example| example.domain == Some(domain));
            examples.shuffle(&mut StdRng::seed_from_u64(DOMAIN_SHUFFLE_SEED));
        }
        Ok(examples)
    }

    pub fn read<T: DeserializeOwned>(&self, key: &StoreKey) -> Result<T, SafegroundError> {
        read_json(&self.path_for(key))
    }

    /// Replaces the file for `key` with the pretty-printed collection.
    pub fn write<T: Serialize + ?Sized>(
        &self,
        key: &StoreKey,
        value: &T,
    ) -> Result<PathBuf, SafegroundError> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let body = serde_json::to_string_pretty(value)?;
        fs::write(&path, body)?;
        tracing::info!(path = %path.display(), "wrote collection");
        Ok(path)
    }

    pub fn read_foveated(
        &self,
        model: &ModelId,
        safe: bool,
    ) -> Result<Vec<Example>, SafegroundError> {
        self.read(&StoreKey::new(Phase::Foveation, model.clone(), safe))
    }

    pub fn read_attributed(
        &self,
        model: &ModelId,
        safe: bool,
        source: AttributionSource,
    ) -> Result<Vec<Example>, SafegroundError> {
        let key = StoreKey::new(Phase::Attribution, model.clone(), safe).with_source(Some(source));
        self.read(&key)
    }

    /// Reasoned examples, from the rationalization family or, with `baseline`,
    /// from the baseline family.
    pub fn read_rationalized(
        &self,
        model: &ModelId,
        safe: bool,
        num_sources: Option<usize>,
        source: Option<AttributionSource>,
        baseline: bool,
    ) -> Result<Vec<Example>, SafegroundError> {
        let phase = if baseline {
            Phase::Baseline
        } else {
            Phase::Rationalization
        };
        self.read(
            &StoreKey::new(phase, model.clone(), safe)
                .with_num_sources(num_sources)
                .with_source(source),
        )
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, SafegroundError> {
    let raw = fs::read_to_string(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => SafegroundError::MissingInput {
            path: path.to_path_buf(),
        },
        _ => SafegroundError::Io(err),
    })?;
    Ok(serde_json::from_str(&raw)?)
}
