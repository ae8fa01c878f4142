use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*(\w+)\s*\}\}").expect("valid placeholder pattern"));

/// Text template with `{{name}}` placeholders. Unknown names render empty.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn render(&self, vars: &HashMap<&str, &str>) -> String {
        PLACEHOLDER
            .replace_all(&self.template, |caps: &regex::Captures| {
                vars.get(&caps[1]).copied().unwrap_or_default().to_string()
            })
            .into_owned()
    }
}

/// Renders a template from `(name, value)` pairs.
pub(crate) fn render(template: &PromptTemplate, pairs: &[(&str, &str)]) -> String {
    let vars: HashMap<&str, &str> = pairs.iter().copied().collect();
    template.render(&vars)
}
