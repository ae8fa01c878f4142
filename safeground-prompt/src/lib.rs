mod chat;
mod error;
mod few_shot;
mod scenario;
mod template;

pub use chat::{ChatPromptTemplate, MessagePromptTemplate};
pub use error::PromptError;
pub use few_shot::{FewShotContext, FOVEATION_FILE, FOVEATION_SHOTS, RATIONALIZATION_FILE};
pub use scenario::{
    attribution_context, augment_snippets, base_scenario, baseline_reasoning_prompt,
    chat_reasoning_prompt, context_prompt, contextualized_reasoning_prompt, extract_source,
    rephrase_advice, SNIPPET_CONTENT_LIMIT,
};
pub use template::PromptTemplate;
