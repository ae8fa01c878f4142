use std::path::Path;

use safeground_core::SafegroundError;

/// Counts tokens the way the reference model's tokenizer does.
pub trait TokenCounter: Send + Sync {
    fn count_tokens(&self, text: &str) -> Result<usize, SafegroundError>;
}

/// HuggingFace tokenizer loaded from a `tokenizer.json` (GPT-2 for the
/// completion models evaluated here).
pub struct HfTokenCounter {
    tokenizer: tokenizers::Tokenizer,
}

impl HfTokenCounter {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SafegroundError> {
        let path = path.as_ref();
        let tokenizer = tokenizers::Tokenizer::from_file(path).map_err(|err| {
            SafegroundError::InvalidConfig(format!(
                "tokenizer '{}' unavailable: {err}",
                path.display()
            ))
        })?;
        Ok(Self { tokenizer })
    }
}

impl TokenCounter for HfTokenCounter {
    fn count_tokens(&self, text: &str) -> Result<usize, SafegroundError> {
        let encoding = self
            .tokenizer
            .encode(text, false)
            .map_err(|err| SafegroundError::Evaluation(format!("tokenization failed: {err}")))?;
        Ok(encoding.get_ids().len())
    }
}
