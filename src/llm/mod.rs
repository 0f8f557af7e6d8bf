//! Chat-completion client abstraction.
//!
//! The pipeline talks to the upstream LLM through the [`ChatCompleter`]
//! trait so tests can substitute a scripted client.

mod openai;

pub use openai::OpenAiChat;

use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Message role in a chat-completion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
}

/// One message in a chat-completion request.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// A chat-completion request: `{model, messages, temperature, max_tokens}`.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// The completion text plus token usage when the endpoint reports it.
#[derive(Debug, Clone)]
pub struct ChatResponse {
    pub content: String,
    pub total_tokens: Option<u32>,
}

/// Trait for chat-completion backends.
#[async_trait]
pub trait ChatCompleter: Send + Sync {
    /// Issue one completion request, failing with `UpstreamTimeout` if no
    /// response arrives within `timeout`.
    async fn complete(&self, request: &ChatRequest, timeout: Duration) -> Result<ChatResponse>;
}
