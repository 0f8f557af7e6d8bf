//! Consolidation of partial summaries into one document.

use super::retry::RetryPolicy;
use crate::config::Prompts;
use crate::error::{NotatError, Result};
use crate::llm::{ChatCompleter, ChatMessage, ChatRequest};
use crate::models::ModelProfile;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Sampling temperature for the merge phase. Lower than segment
/// summarization: coherence matters more than variance here.
pub const CONSOLIDATION_TEMPERATURE: f32 = 0.3;

/// Outcome of the consolidation phase.
#[derive(Debug, Clone)]
pub struct Consolidation {
    pub text: String,
    /// False when a single partial was passed through without a merge call.
    pub merged: bool,
    pub duration: Duration,
    pub total_tokens: Option<u32>,
}

/// Merges ordered partial summaries into one cohesive document.
pub struct Consolidator {
    client: Arc<dyn ChatCompleter>,
    prompts: Prompts,
    timeout: Duration,
    /// Retry policy for the merge call. None keeps the baseline behavior of
    /// a single attempt; chunks are retried but consolidation is not.
    retry: Option<RetryPolicy>,
}

impl Consolidator {
    pub fn new(
        client: Arc<dyn ChatCompleter>,
        prompts: Prompts,
        timeout: Duration,
        retry: Option<RetryPolicy>,
    ) -> Self {
        Self {
            client,
            prompts,
            timeout,
            retry,
        }
    }

    /// Merge partial summaries in chunk order.
    ///
    /// A single partial is returned as-is (trimmed) with no network call.
    pub async fn consolidate(
        &self,
        partials: &[String],
        profile: &ModelProfile,
    ) -> Result<Consolidation> {
        if partials.len() == 1 {
            return Ok(Consolidation {
                text: partials[0].trim().to_string(),
                merged: false,
                duration: Duration::ZERO,
                total_tokens: None,
            });
        }

        let mut vars = HashMap::new();
        vars.insert("sections".to_string(), partials.join("\n\n"));

        let request = ChatRequest {
            model: profile.model_id.clone(),
            messages: vec![
                ChatMessage::system(self.prompts.consolidate.system.clone()),
                ChatMessage::user(
                    self.prompts
                        .render_with_custom(&self.prompts.consolidate.user, &vars),
                ),
            ],
            temperature: CONSOLIDATION_TEMPERATURE,
            max_tokens: profile.max_output_tokens,
        };

        let max_attempts = self.retry.as_ref().map(|p| p.max_attempts).unwrap_or(1);
        let mut attempt = 0;
        loop {
            attempt += 1;
            let started = Instant::now();

            match self.client.complete(&request, self.timeout).await {
                Ok(response) => {
                    let duration = started.elapsed();
                    info!(
                        sections = partials.len(),
                        attempt,
                        elapsed_ms = duration.as_millis() as u64,
                        tokens = response.total_tokens,
                        "summaries consolidated"
                    );
                    return Ok(Consolidation {
                        text: response.content.trim().to_string(),
                        merged: true,
                        duration,
                        total_tokens: response.total_tokens,
                    });
                }
                Err(error) => {
                    let retryable = self
                        .retry
                        .as_ref()
                        .is_some_and(|p| p.is_retryable(&error));
                    if attempt < max_attempts && retryable {
                        // max_attempts > 1 only when a policy is present.
                        let wait = self.retry.as_ref().unwrap().delay_after(attempt);
                        warn!(
                            attempt,
                            wait_ms = wait.as_millis() as u64,
                            %error,
                            "consolidation attempt failed, retrying"
                        );
                        tokio::time::sleep(wait).await;
                    } else if attempt > 1 {
                        return Err(NotatError::Consolidation(format!(
                            "after {} attempts: {}",
                            attempt, error
                        )));
                    } else {
                        return Err(NotatError::Consolidation(error.to_string()));
                    }
                }
            }
        }
    }
}
