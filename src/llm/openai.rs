//! OpenAI-compatible chat-completion client.
//!
//! Works against any endpoint speaking the OpenAI chat-completions wire
//! format (Groq by default), authenticated with a bearer key from process
//! configuration.

use super::{ChatCompleter, ChatRequest, ChatResponse, Role};
use crate::error::{NotatError, Result};
use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Transport-level ceiling; individual requests get tighter deadlines via
/// [`ChatCompleter::complete`].
const HTTP_TIMEOUT_SECS: u64 = 300;

/// Chat client for an OpenAI-compatible endpoint.
pub struct OpenAiChat {
    client: Client<OpenAIConfig>,
}

impl OpenAiChat {
    /// Create a client for the given API base URL and bearer key.
    pub fn new(api_base: &str, api_key: &str) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        let config = OpenAIConfig::new()
            .with_api_base(api_base)
            .with_api_key(api_key);

        Self {
            client: Client::with_config(config).with_http_client(http_client),
        }
    }
}

#[async_trait]
impl ChatCompleter for OpenAiChat {
    async fn complete(&self, request: &ChatRequest, timeout: Duration) -> Result<ChatResponse> {
        let mut messages: Vec<ChatCompletionRequestMessage> = Vec::new();
        for message in &request.messages {
            let built = match message.role {
                Role::System => ChatCompletionRequestSystemMessageArgs::default()
                    .content(message.content.clone())
                    .build()
                    .map_err(|e| NotatError::UpstreamApi(e.to_string()))?
                    .into(),
                Role::User => ChatCompletionRequestUserMessageArgs::default()
                    .content(message.content.clone())
                    .build()
                    .map_err(|e| NotatError::UpstreamApi(e.to_string()))?
                    .into(),
            };
            messages.push(built);
        }

        let completion_request = CreateChatCompletionRequestArgs::default()
            .model(&request.model)
            .messages(messages)
            .temperature(request.temperature)
            .max_tokens(request.max_tokens)
            .build()
            .map_err(|e| NotatError::UpstreamApi(e.to_string()))?;

        debug!(model = %request.model, timeout_secs = timeout.as_secs(), "sending completion request");

        let response = tokio::time::timeout(timeout, self.client.chat().create(completion_request))
            .await
            .map_err(|_| {
                NotatError::UpstreamTimeout(format!(
                    "no response within {}s",
                    timeout.as_secs()
                ))
            })?
            .map_err(map_openai_error)?;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_ref())
            .ok_or_else(|| NotatError::UpstreamApi("empty completion response".to_string()))?
            .clone();

        let total_tokens = response.usage.map(|usage| usage.total_tokens);

        Ok(ChatResponse {
            content,
            total_tokens,
        })
    }
}

/// Keep the timeout/transport distinction from the underlying client.
fn map_openai_error(error: OpenAIError) -> NotatError {
    match error {
        OpenAIError::Reqwest(e) if e.is_timeout() => NotatError::UpstreamTimeout(e.to_string()),
        other => NotatError::UpstreamApi(other.to_string()),
    }
}
