use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::{Lazy, OnceCell};
use safeground_core::{Example, Message, Outcome};

use crate::scenario::{augment_snippets, base_scenario, context_question};
use crate::template::render;
use crate::{ChatPromptTemplate, MessagePromptTemplate, PromptError, PromptTemplate};

pub const FOVEATION_FILE: &str = "foveation.json";
pub const RATIONALIZATION_FILE: &str = "rationalization.json";
/// Exemplars in the foveation block.
pub const FOVEATION_SHOTS: usize = 16;

static EXEMPLAR: Lazy<PromptTemplate> =
    Lazy::new(|| PromptTemplate::new("Q: {{scenario}}\nA: {{answer}}"));
static AUGMENTED_EXEMPLAR: Lazy<PromptTemplate> =
    Lazy::new(|| PromptTemplate::new("{{context}}\nQ: {{scenario}}\nA: {{answer}}"));
static CHAT_EXEMPLAR: Lazy<ChatPromptTemplate> = Lazy::new(|| {
    ChatPromptTemplate::new(vec![
        MessagePromptTemplate::human("Q: {{scenario}}"),
        MessagePromptTemplate::ai("A: {{answer}}"),
    ])
});

/// Few-shot exemplar blocks for one pipeline run.
///
/// Each block is read from the few-shot directory the first time it is
/// requested and reused verbatim afterwards, so the parameters of the first
/// request decide its content. Construct one per phase run and pass it by
/// reference; the cells are safe to initialise from concurrent tasks.
#[derive(Debug)]
pub struct FewShotContext {
    dir: PathBuf,
    foveations: OnceCell<String>,
    explanations: OnceCell<String>,
    augmented: OnceCell<String>,
    chat: OnceCell<Vec<Message>>,
}

impl FewShotContext {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            foveations: OnceCell::new(),
            explanations: OnceCell::new(),
            augmented: OnceCell::new(),
            chat: OnceCell::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn foveation_block(&self) -> Result<&str, PromptError> {
        self.foveations
            .get_or_try_init(|| {
                let path = self.dir.join(FOVEATION_FILE);
                let exemplars = load_exemplars(&path, FOVEATION_SHOTS)?;
                let shots = exemplars
                    .iter()
                    .enumerate()
                    .map(|(index, example)| {
                        let answer = example
                            .foveation_text()
                            .ok_or_else(|| malformed(&path, index, "foveation"))?;
                        Ok(format!(
                            "{} {answer}",
                            context_question(&example.prompt, &example.advice)
                        ))
                    })
                    .collect::<Result<Vec<_>, PromptError>>()?;
                tracing::debug!(exemplars = shots.len(), "built foveation few-shot block");
                Ok(join_block(shots))
            })
            .map(String::as_str)
    }

    pub fn explanation_block(&self, num_examples: usize) -> Result<&str, PromptError> {
        self.explanations
            .get_or_try_init(|| {
                let path = self.dir.join(RATIONALIZATION_FILE);
                let exemplars = load_exemplars(&path, num_examples)?;
                let shots = exemplars
                    .iter()
                    .enumerate()
                    .map(|(index, example)| {
                        let scenario = base_scenario(&example.prompt, &example.advice);
                        let answer = explanation_text(&path, index, example)?;
                        Ok(render(
                            &EXEMPLAR,
                            &[("scenario", scenario.as_str()), ("answer", answer)],
                        ))
                    })
                    .collect::<Result<Vec<_>, PromptError>>()?;
                tracing::debug!(exemplars = shots.len(), "built explanation few-shot block");
                Ok(join_block(shots))
            })
            .map(String::as_str)
    }

    /// Exemplars that carry their own snippet context, `num_sources` wide.
    pub fn augmented_block(
        &self,
        num_examples: usize,
        num_sources: usize,
    ) -> Result<&str, PromptError> {
        self.augmented
            .get_or_try_init(|| {
                let path = self.dir.join(RATIONALIZATION_FILE);
                let exemplars = load_exemplars(&path, num_examples)?;
                let shots = exemplars
                    .iter()
                    .enumerate()
                    .map(|(index, example)| {
                        let snippets = example
                            .attribution
                            .as_ref()
                            .and_then(Outcome::success)
                            .ok_or_else(|| malformed(&path, index, "attribution"))?;
                        let context = augment_snippets(snippets, num_sources)
                            .map_err(|_| malformed(&path, index, "attribution"))?;
                        let scenario = base_scenario(&example.prompt, &example.advice);
                        let answer = explanation_text(&path, index, example)?;
                        Ok(render(
                            &AUGMENTED_EXEMPLAR,
                            &[
                                ("context", context.as_str()),
                                ("scenario", scenario.as_str()),
                                ("answer", answer),
                            ],
                        ))
                    })
                    .collect::<Result<Vec<_>, PromptError>>()?;
                tracing::debug!(
                    exemplars = shots.len(),
                    num_sources,
                    "built augmented few-shot block"
                );
                Ok(join_block(shots))
            })
            .map(String::as_str)
    }

    pub fn chat_exemplars(&self, num_examples: usize) -> Result<&[Message], PromptError> {
        self.chat
            .get_or_try_init(|| {
                let path = self.dir.join(RATIONALIZATION_FILE);
                let exemplars = load_exemplars(&path, num_examples)?;
                let mut messages = Vec::with_capacity(exemplars.len() * 2);
                for (index, example) in exemplars.iter().enumerate() {
                    let scenario = base_scenario(&example.prompt, &example.advice);
                    let answer = explanation_text(&path, index, example)?;
                    messages.extend(CHAT_EXEMPLAR.format_messages(&[
                        ("scenario", scenario.as_str()),
                        ("answer", answer),
                    ]));
                }
                Ok(messages)
            })
            .map(Vec::as_slice)
    }
}

fn load_exemplars(path: &Path, wanted: usize) -> Result<Vec<Example>, PromptError> {
    if wanted == 0 {
        return Ok(Vec::new());
    }

    let unavailable = |reason: String| PromptError::FewShotUnavailable {
        path: path.to_path_buf(),
        reason,
    };
    let raw = fs::read_to_string(path).map_err(|err| unavailable(err.to_string()))?;
    let mut exemplars: Vec<Example> =
        serde_json::from_str(&raw).map_err(|err| unavailable(err.to_string()))?;

    if exemplars.len() < wanted {
        return Err(PromptError::NotEnoughExemplars {
            path: path.to_path_buf(),
            wanted,
            available: exemplars.len(),
        });
    }
    exemplars.truncate(wanted);
    Ok(exemplars)
}

fn explanation_text<'a>(
    path: &Path,
    index: usize,
    example: &'a Example,
) -> Result<&'a str, PromptError> {
    example
        .explanation
        .as_ref()
        .and_then(Outcome::first_candidate)
        .map(|candidate| candidate.completion.as_str())
        .ok_or_else(|| malformed(path, index, "explanation"))
}

fn malformed(path: &Path, index: usize, field: &'static str) -> PromptError {
    PromptError::MalformedExemplar {
        path: path.to_path_buf(),
        index,
        field,
    }
}

fn join_block(shots: Vec<String>) -> String {
    if shots.is_empty() {
        return String::new();
    }
    format!("{}\n\n", shots.join("\n\n"))
}
