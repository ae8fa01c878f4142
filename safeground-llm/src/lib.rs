mod openai;
mod tokenizer;
mod types;

pub use openai::{
    score_candidate, trim_completion, OpenAiCompletionBuilder, OpenAiCompletionClient,
    END_OF_TEXT, OPENAI_BASE_URL, TOP_LOGPROBS,
};
pub use safeground_core::{Candidate, Message, Role};
pub use tokenizer::{HfTokenCounter, TokenCounter};
pub use types::{Completion, CompletionRequest, Prompt};

use safeground_core::Runnable;

/// Anything that answers [`CompletionRequest`]s.
pub trait CompletionClient: Runnable<CompletionRequest, Completion> + Send + Sync {}

impl<T> CompletionClient for T where T: Runnable<CompletionRequest, Completion> + Send + Sync {}
