use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{IntoValue, Value};

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Nature,
    Household,
    Medical,
    Other,
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Nature => "nature",
            Domain::Household => "household",
            Domain::Medical => "medical",
            Domain::Other => "other",
        }
    }
}

/// One scored completion returned by a model.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Candidate {
    pub completion: String,
    pub log_probability: f64,
    /// Top alternatives at the first generated position, keyed by raw token text.
    pub first_token_distribution: BTreeMap<String, f64>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Snippet {
    pub source: String,
    pub content: String,
}

/// Failure shape persisted in place of a collaborator's result.
///
/// `inputs` echoes the arguments of the failed call and is flattened next to
/// `error` on disk.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ErrorRecord {
    pub error: String,
    #[serde(flatten)]
    pub inputs: serde_json::Map<String, Value>,
}

impl ErrorRecord {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            inputs: serde_json::Map::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl IntoValue) -> Self {
        self.inputs.insert(key.to_string(), value.into_value());
        self
    }
}

/// Result of an external call as stored on an [`Example`].
///
/// Serialized untagged so files hold either the success payload or an object
/// carrying an `error` key.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Outcome<T> {
    Success(T),
    Failure(ErrorRecord),
}

impl<T> Outcome<T> {
    pub fn from_result<E>(result: Result<T, E>, on_error: impl FnOnce(E) -> ErrorRecord) -> Self {
        match result {
            Ok(value) => Outcome::Success(value),
            Err(err) => Outcome::Failure(on_error(err)),
        }
    }

    pub fn success(&self) -> Option<&T> {
        match self {
            Outcome::Success(value) => Some(value),
            Outcome::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&ErrorRecord> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure(record) => Some(record),
        }
    }
}

impl Outcome<Vec<Candidate>> {
    /// First candidate of a successful, non-empty completion result.
    pub fn first_candidate(&self) -> Option<&Candidate> {
        self.success().and_then(|candidates| candidates.first())
    }

    pub fn first_candidate_mut(&mut self) -> Option<&mut Candidate> {
        match self {
            Outcome::Success(candidates) => candidates.first_mut(),
            Outcome::Failure(_) => None,
        }
    }
}

/// A (prompt, advice) pair plus whatever the phases have attached so far.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Example {
    pub prompt: String,
    pub advice: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<Domain>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foveation: Option<Outcome<Vec<Candidate>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribution: Option<Outcome<Vec<Snippet>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<Outcome<Vec<Candidate>>>,
    /// Dataset keys this crate does not interpret, kept for lossless rewrites.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl Example {
    pub fn new(prompt: impl Into<String>, advice: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            advice: advice.into(),
            domain: None,
            foveation: None,
            attribution: None,
            context: None,
            explanation: None,
            extra: serde_json::Map::new(),
        }
    }

    pub fn with_domain(mut self, domain: Domain) -> Self {
        self.domain = Some(domain);
        self
    }

    /// Text of the first foveation candidate, if foveation succeeded.
    pub fn foveation_text(&self) -> Option<&str> {
        self.foveation
            .as_ref()
            .and_then(Outcome::first_candidate)
            .map(|candidate| candidate.completion.as_str())
    }
}
