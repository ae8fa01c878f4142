//! OpenAI-compatible completion client with log-probability scoring.
//!
//! Text prompts go to `/v1/completions`, message prompts to
//! `/v1/chat/completions`. Both are normalised into [`Candidate`]s.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use url::Url;

use safeground_core::{Candidate, Message, Runnable, SafegroundError};

use crate::{Completion, CompletionRequest, Prompt};

pub const OPENAI_BASE_URL: &str = "https://api.openai.com";
/// Marker after which generated tokens no longer count toward the score.
pub const END_OF_TEXT: &str = "<|endoftext|>";
/// Alternatives requested per generated position.
pub const TOP_LOGPROBS: u32 = 5;

#[derive(Clone)]
pub struct OpenAiCompletionClient {
    base_url: Url,
    api_key: SecretString,
    http: Client,
}

pub struct OpenAiCompletionBuilder {
    base_url: Url,
    api_key: Option<SecretString>,
    timeout: Duration,
}

impl OpenAiCompletionBuilder {
    pub fn base_url(mut self, base_url: &str) -> Result<Self, SafegroundError> {
        self.base_url = Url::parse(base_url)
            .map_err(|err| SafegroundError::InvalidConfig(format!("base url: {err}")))?;
        Ok(self)
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::new(api_key.into()));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<OpenAiCompletionClient, SafegroundError> {
        let api_key = self
            .api_key
            .ok_or_else(|| SafegroundError::InvalidConfig("missing OpenAI API key".to_string()))?;
        let http = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|err| SafegroundError::LlmProvider(err.to_string()))?;
        Ok(OpenAiCompletionClient {
            base_url: self.base_url,
            api_key,
            http,
        })
    }
}

impl OpenAiCompletionClient {
    pub fn builder() -> OpenAiCompletionBuilder {
        OpenAiCompletionBuilder {
            base_url: Url::parse(OPENAI_BASE_URL).expect("valid default base url"),
            api_key: None,
            timeout: Duration::from_secs(60),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.as_str().trim_end_matches('/'))
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, SafegroundError>
    where
        B: Serialize + ?Sized,
        R: for<'de> Deserialize<'de>,
    {
        let response = self
            .http
            .post(self.endpoint(path))
            .bearer_auth(self.api_key.expose_secret())
            .json(body)
            .send()
            .await
            .map_err(|err| SafegroundError::LlmProvider(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<OpenAiError>(&body)
                .map(|err| err.error.message)
                .unwrap_or(body);
            return Err(SafegroundError::LlmProvider(format!(
                "status {status}: {message}"
            )));
        }

        response
            .json()
            .await
            .map_err(|err| SafegroundError::LlmProvider(err.to_string()))
    }

    async fn complete_text(
        &self,
        request: &CompletionRequest,
        prompt: &str,
    ) -> Result<Completion, SafegroundError> {
        let body = TextCompletionBody {
            model: &request.model,
            prompt,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            top_p: request.top_p,
            stop: request.stop.as_deref(),
            logprobs: TOP_LOGPROBS,
            frequency_penalty: request.frequency_penalty,
            presence_penalty: request.presence_penalty,
        };
        let response: TextCompletionResponse = self.post("/v1/completions", &body).await?;

        if !request.uncertainty {
            let choice = response.choices.into_iter().next().ok_or_else(no_choices)?;
            return Ok(Completion::Text(trim_completion(&choice.text).to_string()));
        }

        let candidates = response
            .choices
            .into_iter()
            .map(|choice| {
                let logprobs = choice.logprobs.unwrap_or_default();
                let first = logprobs
                    .top_logprobs
                    .into_iter()
                    .next()
                    .flatten()
                    .unwrap_or_default();
                score_candidate(
                    &choice.text,
                    &logprobs.tokens,
                    &logprobs.token_logprobs,
                    first,
                    request.max_tokens,
                )
            })
            .collect();
        Ok(Completion::Scored(candidates))
    }

    async fn complete_chat(
        &self,
        request: &CompletionRequest,
        messages: &[Message],
    ) -> Result<Completion, SafegroundError> {
        let body = ChatCompletionBody {
            model: &request.model,
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            top_p: request.top_p,
            stop: request.stop.as_deref(),
            logprobs: request.uncertainty,
            top_logprobs: request.uncertainty.then_some(TOP_LOGPROBS),
            frequency_penalty: request.frequency_penalty,
            presence_penalty: request.presence_penalty,
        };
        let response: ChatCompletionResponse = self.post("/v1/chat/completions", &body).await?;

        if !request.uncertainty {
            let choice = response.choices.into_iter().next().ok_or_else(no_choices)?;
            let text = choice.message.content.unwrap_or_default();
            return Ok(Completion::Text(trim_completion(&text).to_string()));
        }

        let candidates = response
            .choices
            .into_iter()
            .map(|choice| {
                let text = choice.message.content.unwrap_or_default();
                let positions = choice.logprobs.map(|lp| lp.content).unwrap_or_default();
                let tokens: Vec<String> = positions.iter().map(|p| p.token.clone()).collect();
                let logprobs: Vec<Option<f64>> =
                    positions.iter().map(|p| Some(p.logprob)).collect();
                let first = positions
                    .first()
                    .map(|p| {
                        p.top_logprobs
                            .iter()
                            .map(|alt| (alt.token.clone(), alt.logprob))
                            .collect()
                    })
                    .unwrap_or_default();
                score_candidate(&text, &tokens, &logprobs, first, request.max_tokens)
            })
            .collect();
        Ok(Completion::Scored(candidates))
    }
}

#[async_trait::async_trait]
impl Runnable<CompletionRequest, Completion> for OpenAiCompletionClient {
    async fn invoke(&self, input: CompletionRequest) -> Result<Completion, SafegroundError> {
        tracing::debug!(
            model = %input.model,
            max_tokens = input.max_tokens,
            uncertainty = input.uncertainty,
            "requesting completion"
        );
        match &input.prompt {
            Prompt::Text(text) => self.complete_text(&input, text).await,
            Prompt::Messages(messages) => self.complete_chat(&input, messages).await,
        }
    }
}

fn no_choices() -> SafegroundError {
    SafegroundError::LlmProvider("no choices returned".to_string())
}

/// Strips surrounding spaces and periods from generated text.
pub fn trim_completion(text: &str) -> &str {
    text.trim_matches(|c| c == ' ' || c == '.')
}

/// Builds a candidate, summing log-probabilities up to the end-of-text marker
/// or `max_tokens` positions, whichever comes first.
pub fn score_candidate(
    text: &str,
    tokens: &[String],
    token_logprobs: &[Option<f64>],
    first_token_distribution: BTreeMap<String, f64>,
    max_tokens: u32,
) -> Candidate {
    let stop_index = tokens
        .iter()
        .position(|token| token == END_OF_TEXT)
        .unwrap_or(max_tokens as usize);
    let log_probability = token_logprobs
        .iter()
        .take(stop_index)
        .flatten()
        .sum();

    Candidate {
        completion: trim_completion(text).to_string(),
        log_probability,
        first_token_distribution,
    }
}

#[derive(Serialize)]
struct TextCompletionBody<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<&'a [String]>,
    logprobs: u32,
    frequency_penalty: f32,
    presence_penalty: f32,
}

#[derive(Deserialize)]
struct TextCompletionResponse {
    choices: Vec<TextChoice>,
}

#[derive(Deserialize)]
struct TextChoice {
    text: String,
    #[serde(default)]
    logprobs: Option<TextLogprobs>,
}

#[derive(Deserialize, Default)]
struct TextLogprobs {
    #[serde(default)]
    tokens: Vec<String>,
    #[serde(default)]
    token_logprobs: Vec<Option<f64>>,
    #[serde(default)]
    top_logprobs: Vec<Option<BTreeMap<String, f64>>>,
}

#[derive(Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: &'a [Message],
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<&'a [String]>,
    logprobs: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_logprobs: Option<u32>,
    frequency_penalty: f32,
    presence_penalty: f32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
    #[serde(default)]
    logprobs: Option<ChatLogprobs>,
}

#[derive(Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatLogprobs {
    #[serde(default)]
    content: Vec<ChatTokenLogprob>,
}

#[derive(Deserialize)]
struct ChatTokenLogprob {
    token: String,
    logprob: f64,
    #[serde(default)]
    top_logprobs: Vec<ChatTopLogprob>,
}

#[derive(Deserialize)]
struct ChatTopLogprob {
    token: String,
    logprob: f64,
}

#[derive(Deserialize)]
struct OpenAiError {
    error: OpenAiErrorDetail,
}

#[derive(Deserialize)]
struct OpenAiErrorDetail {
    message: String,
}
