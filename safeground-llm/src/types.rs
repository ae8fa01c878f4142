use safeground_core::{Candidate, ErrorRecord, Message, SafegroundError};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Prompt {
    Text(String),
    Messages(Vec<Message>),
}

impl From<String> for Prompt {
    fn from(text: String) -> Self {
        Prompt::Text(text)
    }
}

impl From<Vec<Message>> for Prompt {
    fn from(messages: Vec<Message>) -> Self {
        Prompt::Messages(messages)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CompletionRequest {
    pub prompt: Prompt,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub stop: Option<Vec<String>>,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
    /// Ask for per-token log-probabilities and return scored candidates.
    pub uncertainty: bool,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<Prompt>, model: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: model.into(),
            max_tokens: 256,
            temperature: 0.0,
            top_p: 1.0,
            stop: None,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
            uncertainty: false,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_stop<I, S>(mut self, stop: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stop = Some(stop.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_uncertainty(mut self, uncertainty: bool) -> Self {
        self.uncertainty = uncertainty;
        self
    }

    /// Failure record echoing this request next to the error text.
    pub fn error_record(&self, err: &SafegroundError) -> ErrorRecord {
        ErrorRecord::new(err.to_string())
            .with("prompt", &self.prompt)
            .with("max_tokens", self.max_tokens)
            .with("temperature", self.temperature)
            .with("top_p", self.top_p)
            .with("model", &self.model)
            .with("stop_tokens", &self.stop)
            .with("uncertainty", self.uncertainty)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Completion {
    /// Trimmed text of the first choice.
    Text(String),
    /// One scored candidate per returned choice.
    Scored(Vec<Candidate>),
}

impl Completion {
    pub fn into_candidates(self) -> Result<Vec<Candidate>, SafegroundError> {
        match self {
            Completion::Scored(candidates) => Ok(candidates),
            Completion::Text(_) => Err(SafegroundError::LlmProvider(
                "completion returned without log-probabilities".to_string(),
            )),
        }
    }
}
