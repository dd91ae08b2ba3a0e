//! Common types for LLM chat completions.

use serde::{Deserialize, Serialize};

/// A chat completion request (OpenAI-compatible format).
#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
}

impl ChatRequest {
    /// A single-turn request carrying one user message.
    pub fn single_turn(model: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: vec![Message {
                role: Role::User,
                content: content.into(),
            }],
        }
    }
}

/// A message in a chat conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

/// The role of a message sender.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A chat completion response.
///
/// Every field is optional: providers differ in what they return and the relay
/// only needs the first choice's content.
#[derive(Debug, Default, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Option<Vec<Choice>>,
}

impl ChatResponse {
    fn first_choice(&self) -> Option<&Choice> {
        self.choices.as_deref()?.first()
    }

    /// Content of the first choice, if the provider sent one.
    pub fn first_content(&self) -> Option<&str> {
        self.first_choice()?.message.as_ref()?.content.as_deref()
    }

    /// Why the first choice stopped (`stop`, `length`, ...).
    pub fn first_finish_reason(&self) -> Option<&str> {
        self.first_choice()?.finish_reason.as_deref()
    }
}

/// A single completion choice.
#[derive(Debug, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<ResponseMessage>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// The message of a completion choice.
#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}
