use safeground_core::{Message, Role};

use crate::template::render;
use crate::PromptTemplate;

#[derive(Debug, Clone)]
pub enum MessagePromptTemplate {
    Human(PromptTemplate),
    AI(PromptTemplate),
    System(PromptTemplate),
}

impl MessagePromptTemplate {
    pub fn human(template: &str) -> Self {
        Self::Human(PromptTemplate::new(template))
    }

    pub fn ai(template: &str) -> Self {
        Self::AI(PromptTemplate::new(template))
    }

    pub fn system(template: &str) -> Self {
        Self::System(PromptTemplate::new(template))
    }

    pub fn format(&self, pairs: &[(&str, &str)]) -> Message {
        match self {
            MessagePromptTemplate::Human(t) => Message::new(Role::User, render(t, pairs)),
            MessagePromptTemplate::AI(t) => Message::new(Role::Assistant, render(t, pairs)),
            MessagePromptTemplate::System(t) => Message::new(Role::System, render(t, pairs)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChatPromptTemplate {
    messages: Vec<MessagePromptTemplate>,
}

impl ChatPromptTemplate {
    pub fn new(messages: Vec<MessagePromptTemplate>) -> Self {
        Self { messages }
    }

    pub fn format_messages(&self, pairs: &[(&str, &str)]) -> Vec<Message> {
        self.messages.iter().map(|tmpl| tmpl.format(pairs)).collect()
    }
}
