//! Scenario text shared by every phase.

use once_cell::sync::Lazy;
use safeground_core::{Message, Outcome, Snippet};

use crate::template::render;
use crate::{FewShotContext, MessagePromptTemplate, PromptError, PromptTemplate};

/// Characters of snippet content kept per source.
pub const SNIPPET_CONTENT_LIMIT: usize = 600;

static BASE_SCENARIO: Lazy<PromptTemplate> =
    Lazy::new(|| PromptTemplate::new("{{prompt}}, should you {{advice}}?"));
static CONTEXT_QUESTION: Lazy<PromptTemplate> = Lazy::new(|| {
    PromptTemplate::new("Q: To answer, \"{{scenario}}\" what do we first need context about?\nA:")
});
static REASONING_QUESTION: Lazy<PromptTemplate> =
    Lazy::new(|| PromptTemplate::new("Q: {{scenario}}\nA:"));
static CONTEXTUALIZED_QUESTION: Lazy<PromptTemplate> =
    Lazy::new(|| PromptTemplate::new("{{context}}\nQ: {{scenario}}\nA:"));
static SNIPPET_SEGMENT: Lazy<PromptTemplate> =
    Lazy::new(|| PromptTemplate::new("{{source}}: {{content}}"));
static CHAT_QUESTION: Lazy<MessagePromptTemplate> =
    Lazy::new(|| MessagePromptTemplate::system("Q: {{scenario}}"));

/// Turns negated imperatives into an action phrase ("don't swim" -> "not swim").
pub fn rephrase_advice(advice: &str) -> String {
    advice.replace("don't", "not").replace("do not", "not")
}

pub fn base_scenario(prompt: &str, advice: &str) -> String {
    let advice = rephrase_advice(advice);
    render(&BASE_SCENARIO, &[("prompt", prompt), ("advice", advice.as_str())])
}

/// Host part of a snippet URL: `https://cdc.gov/a/b` -> `cdc.gov`.
pub fn extract_source(url: &str) -> &str {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    rest.split('/').next().unwrap_or(rest)
}

/// Formats the top `num_sources` snippets as `"host: content; host: content"`.
pub fn augment_snippets(snippets: &[Snippet], num_sources: usize) -> Result<String, PromptError> {
    if snippets.is_empty() {
        return Err(PromptError::NoSnippets);
    }

    let segments: Vec<String> = snippets
        .iter()
        .take(num_sources)
        .map(|snippet| {
            let content: String = snippet.content.chars().take(SNIPPET_CONTENT_LIMIT).collect();
            render(
                &SNIPPET_SEGMENT,
                &[
                    ("source", extract_source(&snippet.source)),
                    ("content", content.as_str()),
                ],
            )
        })
        .collect();
    Ok(segments.join("; "))
}

/// Context block for an example's attribution, or why it cannot be built.
pub fn attribution_context(
    attribution: Option<&Outcome<Vec<Snippet>>>,
    num_sources: usize,
) -> Result<String, PromptError> {
    match attribution {
        None => Err(PromptError::MissingAttribution),
        Some(Outcome::Failure(record)) => Err(PromptError::AttributionFailed(record.error.clone())),
        Some(Outcome::Success(snippets)) => augment_snippets(snippets, num_sources),
    }
}

pub(crate) fn context_question(prompt: &str, advice: &str) -> String {
    let scenario = base_scenario(prompt, advice);
    render(&CONTEXT_QUESTION, &[("scenario", scenario.as_str())])
}

/// Asks which context is needed to judge the scenario.
///
/// With `few_shot`, the foveation exemplar block from `ctx` is prepended.
pub fn context_prompt(
    ctx: &FewShotContext,
    prompt: &str,
    advice: &str,
    few_shot: bool,
) -> Result<String, PromptError> {
    let question = context_question(prompt, advice);
    if !few_shot {
        return Ok(question);
    }
    Ok(format!("{}{question}", ctx.foveation_block()?))
}

pub fn baseline_reasoning_prompt(
    ctx: &FewShotContext,
    prompt: &str,
    advice: &str,
    num_examples: usize,
) -> Result<String, PromptError> {
    let scenario = base_scenario(prompt, advice);
    let question = render(&REASONING_QUESTION, &[("scenario", scenario.as_str())]);
    Ok(format!("{}{question}", ctx.explanation_block(num_examples)?))
}

pub fn contextualized_reasoning_prompt(
    ctx: &FewShotContext,
    prompt: &str,
    advice: &str,
    context: &str,
    num_sources: usize,
    num_examples: usize,
) -> Result<String, PromptError> {
    let scenario = base_scenario(prompt, advice);
    let question = render(
        &CONTEXTUALIZED_QUESTION,
        &[("context", context), ("scenario", scenario.as_str())],
    );
    Ok(format!(
        "{}{question}",
        ctx.augmented_block(num_examples, num_sources)?
    ))
}

/// Message-list variant of [`baseline_reasoning_prompt`] for chat models.
pub fn chat_reasoning_prompt(
    ctx: &FewShotContext,
    prompt: &str,
    advice: &str,
    num_examples: usize,
) -> Result<Vec<Message>, PromptError> {
    let scenario = base_scenario(prompt, advice);
    let mut messages = ctx.chat_exemplars(num_examples)?.to_vec();
    messages.push(CHAT_QUESTION.format(&[("scenario", scenario.as_str())]));
    Ok(messages)
}
