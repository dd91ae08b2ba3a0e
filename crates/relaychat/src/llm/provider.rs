//! LLM provider trait.

use async_trait::async_trait;

use super::error::LLMError;
use super::types::{ChatRequest, ChatResponse};

/// Trait for chat-completion providers.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Make a single, non-streaming chat completion request.
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, LLMError>;
}
