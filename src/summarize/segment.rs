//! Per-chunk segment summarization with bounded retry.

use super::retry::RetryPolicy;
use crate::config::Prompts;
use crate::error::{NotatError, Result};
use crate::llm::{ChatCompleter, ChatMessage, ChatRequest};
use crate::models::ModelProfile;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Summary of one chunk, with per-chunk diagnostics.
#[derive(Debug, Clone)]
pub struct ChunkSummary {
    /// 1-based position of the chunk in the transcript.
    pub index: usize,
    pub text: String,
    /// Wall time of the successful attempt.
    pub duration: Duration,
    /// Token usage, when the endpoint reports it.
    pub total_tokens: Option<u32>,
    /// Attempts consumed, including the successful one.
    pub attempts: u32,
}

/// Issues one completion request per chunk, retrying with linear backoff.
pub struct SegmentSummarizer {
    client: Arc<dyn ChatCompleter>,
    prompts: Prompts,
    policy: RetryPolicy,
    timeout: Duration,
}

impl SegmentSummarizer {
    pub fn new(
        client: Arc<dyn ChatCompleter>,
        prompts: Prompts,
        policy: RetryPolicy,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            prompts,
            policy,
            timeout,
        }
    }

    /// Summarize chunk `index` of `total`.
    ///
    /// On exhausting the retry budget the error names the chunk position and
    /// attempt count; the caller aborts the whole pipeline (all-or-nothing).
    pub async fn summarize_chunk(
        &self,
        chunk: &str,
        index: usize,
        total: usize,
        profile: &ModelProfile,
    ) -> Result<ChunkSummary> {
        let mut vars = HashMap::new();
        vars.insert("part".to_string(), index.to_string());
        vars.insert("total".to_string(), total.to_string());
        vars.insert("chunk".to_string(), chunk.to_string());

        let request = ChatRequest {
            model: profile.model_id.clone(),
            messages: vec![
                ChatMessage::system(self.prompts.summarize.system.clone()),
                ChatMessage::user(
                    self.prompts
                        .render_with_custom(&self.prompts.summarize.user, &vars),
                ),
            ],
            temperature: profile.temperature,
            max_tokens: profile.max_output_tokens,
        };

        let mut attempt = 0;
        loop {
            attempt += 1;
            let started = Instant::now();

            match self.client.complete(&request, self.timeout).await {
                Ok(response) => {
                    let duration = started.elapsed();
                    info!(
                        chunk = index,
                        total,
                        attempt,
                        elapsed_ms = duration.as_millis() as u64,
                        tokens = response.total_tokens,
                        "chunk summarized"
                    );
                    return Ok(ChunkSummary {
                        index,
                        text: response.content,
                        duration,
                        total_tokens: response.total_tokens,
                        attempts: attempt,
                    });
                }
                Err(error) => {
                    if attempt < self.policy.max_attempts && self.policy.is_retryable(&error) {
                        let wait = self.policy.delay_after(attempt);
                        warn!(
                            chunk = index,
                            total,
                            attempt,
                            wait_ms = wait.as_millis() as u64,
                            %error,
                            "chunk attempt failed, retrying"
                        );
                        tokio::time::sleep(wait).await;
                    } else {
                        return Err(NotatError::ChunkExhausted {
                            chunk: index,
                            total,
                            attempts: attempt,
                            last_error: error.to_string(),
                        });
                    }
                }
            }
        }
    }
}
