//! Pipeline orchestrator for Notat.
//!
//! Sequences chunking, per-chunk summarization, and consolidation for one
//! transcript, and maps every failure mode to [`NotatError`]. Chunks are
//! processed strictly in order, never concurrently: this bounds upstream
//! rate and cost predictably and keeps the linear backoff meaningful.
//! Invocations are independent; the only shared state is the read-only
//! model registry.

use crate::chunking::chunk_text;
use crate::config::{Prompts, Settings};
use crate::error::{NotatError, Result};
use crate::llm::{ChatCompleter, OpenAiChat};
use crate::models::ModelRegistry;
use crate::summarize::{
    ChunkSummary, Consolidator, RetryPolicy, SegmentSummarizer, SummarizeOptions,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, instrument};

/// Final summary plus diagnostics for one pipeline invocation.
#[derive(Debug, Clone)]
pub struct SummaryOutcome {
    /// The consolidated (or pass-through) summary text.
    pub summary: String,
    pub chunk_count: usize,
    /// Whether a second-phase merge call was made.
    pub consolidated: bool,
    /// Per-chunk diagnostics, in chunk order.
    pub chunks: Vec<ChunkReport>,
    /// Total reported token usage across all calls, when available.
    pub total_tokens: Option<u32>,
    pub elapsed: Duration,
}

impl SummaryOutcome {
    /// Split the summary into presentation-ready notes: one per non-empty
    /// line, trimmed.
    pub fn notes(&self) -> Vec<String> {
        self.summary
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Timing and retry diagnostics for one chunk.
#[derive(Debug, Clone)]
pub struct ChunkReport {
    pub index: usize,
    pub attempts: u32,
    pub duration: Duration,
    pub total_tokens: Option<u32>,
}

impl From<&ChunkSummary> for ChunkReport {
    fn from(summary: &ChunkSummary) -> Self {
        Self {
            index: summary.index,
            attempts: summary.attempts,
            duration: summary.duration,
            total_tokens: summary.total_tokens,
        }
    }
}

/// The main summarization pipeline.
pub struct SummaryPipeline {
    client: Arc<dyn ChatCompleter>,
    registry: ModelRegistry,
    prompts: Prompts,
    defaults: PipelineDefaults,
}

/// Defaults resolved from settings at construction time.
#[derive(Debug, Clone)]
struct PipelineDefaults {
    retries: u32,
    timeout: Duration,
    backoff_unit: Duration,
    retry_consolidation: bool,
}

impl SummaryPipeline {
    /// Create a pipeline from settings, with the real chat client.
    ///
    /// Fails when the API key environment variable is unset.
    pub fn new(settings: &Settings) -> Result<Self> {
        let api_key = std::env::var(&settings.llm.api_key_env).map_err(|_| {
            NotatError::Config(format!(
                "environment variable {} is not set",
                settings.llm.api_key_env
            ))
        })?;
        let client = Arc::new(OpenAiChat::new(&settings.llm.api_base, &api_key));
        Self::with_client(settings, client)
    }

    /// Create a pipeline with a custom chat client (used by tests).
    pub fn with_client(settings: &Settings, client: Arc<dyn ChatCompleter>) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let mut registry = ModelRegistry::with_defaults();
        for profile in &settings.llm.extra_profiles {
            registry.register(profile.clone())?;
        }
        if let Some(model) = &settings.llm.default_model {
            registry.set_default(model)?;
        }

        Ok(Self {
            client,
            registry,
            prompts,
            defaults: PipelineDefaults {
                retries: settings.llm.retries,
                timeout: Duration::from_secs(settings.llm.timeout_seconds),
                backoff_unit: Duration::from_secs(settings.llm.backoff_seconds),
                retry_consolidation: settings.llm.retry_consolidation,
            },
        })
    }

    /// The model registry backing this pipeline.
    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Summarize a transcript into one coherent document.
    ///
    /// All-or-nothing: if any chunk exhausts its retry budget the whole
    /// invocation fails and no partial output is returned.
    #[instrument(skip(self, transcript, options), fields(chars = transcript.len()))]
    pub async fn summarize(
        &self,
        transcript: &str,
        options: &SummarizeOptions,
    ) -> Result<SummaryOutcome> {
        let started = Instant::now();

        if transcript.trim().is_empty() {
            return Err(NotatError::InvalidInput(
                "transcript is empty, nothing to summarize".to_string(),
            ));
        }

        // Resolve the profile before any network call, so an unknown model
        // fails with zero upstream cost.
        let model_id = options
            .model
            .as_deref()
            .unwrap_or_else(|| self.registry.default_model_id());
        let profile = self.registry.lookup(model_id)?;

        let chunks = chunk_text(transcript, profile.chunk_size_chars);
        info!(
            chunks = chunks.len(),
            model = %profile.model_id,
            "summarizing transcript"
        );

        let policy = RetryPolicy::new(
            options.retries.unwrap_or(self.defaults.retries),
            self.defaults.backoff_unit,
        );
        let timeout = options.timeout.unwrap_or(self.defaults.timeout);

        let summarizer = SegmentSummarizer::new(
            self.client.clone(),
            self.prompts.clone(),
            policy.clone(),
            timeout,
        );

        let total = chunks.len();
        let mut partials: Vec<String> = Vec::with_capacity(total);
        let mut reports: Vec<ChunkReport> = Vec::with_capacity(total);
        for (i, chunk) in chunks.iter().enumerate() {
            let summary = summarizer
                .summarize_chunk(chunk, i + 1, total, profile)
                .await?;
            reports.push(ChunkReport::from(&summary));
            partials.push(summary.text);
        }

        let (summary, consolidated, merge_tokens) = if options.consolidate {
            let consolidator = Consolidator::new(
                self.client.clone(),
                self.prompts.clone(),
                timeout,
                self.defaults.retry_consolidation.then(|| policy.clone()),
            );
            let merged = consolidator.consolidate(&partials, profile).await?;
            (merged.text, merged.merged, merged.total_tokens)
        } else {
            (partials.join("\n\n").trim().to_string(), false, None)
        };

        let chunk_tokens: u32 = reports.iter().filter_map(|r| r.total_tokens).sum();
        let reported_any =
            reports.iter().any(|r| r.total_tokens.is_some()) || merge_tokens.is_some();
        let total_tokens =
            reported_any.then(|| chunk_tokens + merge_tokens.unwrap_or(0));

        let elapsed = started.elapsed();
        info!(
            chunks = total,
            consolidated,
            elapsed_ms = elapsed.as_millis() as u64,
            tokens = total_tokens,
            "summary complete"
        );

        Ok(SummaryOutcome {
            summary,
            chunk_count: total,
            consolidated,
            chunks: reports,
            total_tokens,
            elapsed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{ChatRequest, ChatResponse};
    use crate::models::ModelProfile;
    use crate::summarize::CONSOLIDATION_TEMPERATURE;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Scripted chat client: records every request and fails on schedule.
    struct MockChat {
        requests: Mutex<Vec<ChatRequest>>,
        /// Indices (1-based call order) that should fail.
        failing_calls: Vec<usize>,
        /// When set, every call fails with this flavor of error.
        fail_always: bool,
    }

    impl MockChat {
        fn new() -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
                failing_calls: Vec::new(),
                fail_always: false,
            }
        }

        fn failing_on(calls: &[usize]) -> Self {
            Self {
                failing_calls: calls.to_vec(),
                ..Self::new()
            }
        }

        fn always_failing() -> Self {
            Self {
                fail_always: true,
                ..Self::new()
            }
        }

        fn call_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        fn request(&self, index: usize) -> ChatRequest {
            self.requests.lock().unwrap()[index].clone()
        }
    }

    #[async_trait]
    impl ChatCompleter for MockChat {
        async fn complete(
            &self,
            request: &ChatRequest,
            _timeout: Duration,
        ) -> Result<ChatResponse> {
            let call = {
                let mut requests = self.requests.lock().unwrap();
                requests.push(request.clone());
                requests.len()
            };
            if self.fail_always || self.failing_calls.contains(&call) {
                return Err(NotatError::UpstreamApi("simulated 503".to_string()));
            }
            Ok(ChatResponse {
                content: format!("summary {}", call),
                total_tokens: Some(100),
            })
        }
    }

    /// Settings with zero backoff and a small test model so tests run fast
    /// and chunk counts are easy to control.
    fn test_settings() -> Settings {
        let mut settings = Settings::default();
        settings.llm.backoff_seconds = 0;
        settings.llm.extra_profiles = vec![ModelProfile::new("test-model", 256, 0.7, 40)];
        settings.llm.default_model = Some("test-model".to_string());
        settings
    }

    fn pipeline_with(client: Arc<MockChat>) -> SummaryPipeline {
        SummaryPipeline::with_client(&test_settings(), client).unwrap()
    }

    #[tokio::test]
    async fn test_empty_transcript_fails_before_any_call() {
        let mock = Arc::new(MockChat::new());
        let pipeline = pipeline_with(mock.clone());

        let err = pipeline
            .summarize("   \n ", &SummarizeOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, NotatError::InvalidInput(_)));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_model_fails_before_any_call() {
        let mock = Arc::new(MockChat::new());
        let pipeline = pipeline_with(mock.clone());

        let options = SummarizeOptions {
            model: Some("nonexistent-model".to_string()),
            ..Default::default()
        };
        let err = pipeline
            .summarize("Some transcript.", &options)
            .await
            .unwrap_err();
        assert!(matches!(err, NotatError::UnknownModel(ref m) if m == "nonexistent-model"));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_single_chunk_passes_through_without_consolidation() {
        let mock = Arc::new(MockChat::new());
        let pipeline = pipeline_with(mock.clone());

        let outcome = pipeline
            .summarize("A short transcript.", &SummarizeOptions::default())
            .await
            .unwrap();

        assert_eq!(mock.call_count(), 1);
        assert_eq!(outcome.chunk_count, 1);
        assert!(!outcome.consolidated);
        assert_eq!(outcome.summary, "summary 1");

        // The one request is a segment prompt carrying chunk position.
        let request = mock.request(0);
        assert_eq!(request.model, "test-model");
        assert!(request.messages[1].content.contains("part 1/1"));
        assert!(request.messages[1].content.contains("A short transcript."));
    }

    #[tokio::test]
    async fn test_multi_chunk_consolidates_at_lower_temperature() {
        let mock = Arc::new(MockChat::new());
        let pipeline = pipeline_with(mock.clone());

        // Three sentences, 40-char ceiling: three chunks.
        let transcript =
            "First sentence about the topic here. Second sentence about the topic. Third sentence closes it out.";
        let outcome = pipeline
            .summarize(transcript, &SummarizeOptions::default())
            .await
            .unwrap();

        assert_eq!(outcome.chunk_count, 3);
        assert!(outcome.consolidated);
        assert_eq!(mock.call_count(), 4);

        // The merge request carries every partial, in order, joined by
        // blank lines, at the consolidation temperature.
        let merge = mock.request(3);
        assert_eq!(merge.temperature, CONSOLIDATION_TEMPERATURE);
        assert!(merge.messages[1].content.contains("summary 1\n\nsummary 2\n\nsummary 3"));
        assert_eq!(outcome.summary, "summary 4");
        assert_eq!(outcome.total_tokens, Some(400));
    }

    #[tokio::test]
    async fn test_consolidation_can_be_disabled() {
        let mock = Arc::new(MockChat::new());
        let pipeline = pipeline_with(mock.clone());

        let transcript =
            "First sentence about the topic here. Second sentence about the topic. Third sentence closes it out.";
        let options = SummarizeOptions {
            consolidate: false,
            ..Default::default()
        };
        let outcome = pipeline.summarize(transcript, &options).await.unwrap();

        assert_eq!(mock.call_count(), 3);
        assert!(!outcome.consolidated);
        assert_eq!(outcome.summary, "summary 1\n\nsummary 2\n\nsummary 3");
    }

    #[tokio::test]
    async fn test_retry_exhaustion_names_chunk_and_attempts() {
        let mock = Arc::new(MockChat::always_failing());
        let pipeline = pipeline_with(mock.clone());

        let err = pipeline
            .summarize("A short transcript.", &SummarizeOptions::default())
            .await
            .unwrap_err();

        assert_eq!(mock.call_count(), 3);
        match err {
            NotatError::ChunkExhausted {
                chunk,
                total,
                attempts,
                ref last_error,
            } => {
                assert_eq!(chunk, 1);
                assert_eq!(total, 1);
                assert_eq!(attempts, 3);
                assert!(last_error.contains("simulated 503"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_all_or_nothing_on_mid_pipeline_failure() {
        // Chunk 1 succeeds (call 1); chunk 2 fails on calls 2, 3, 4.
        let mock = Arc::new(MockChat::failing_on(&[2, 3, 4]));
        let pipeline = pipeline_with(mock.clone());

        let transcript =
            "First sentence about the topic here. Second sentence about the topic. Third sentence closes it out.";
        let err = pipeline
            .summarize(transcript, &SummarizeOptions::default())
            .await
            .unwrap_err();

        // Chunk 1 succeeded, chunk 2 exhausted its budget, chunk 3 never ran.
        assert_eq!(mock.call_count(), 4);
        assert!(
            matches!(err, NotatError::ChunkExhausted { chunk: 2, total: 3, attempts: 3, .. })
        );
    }

    #[tokio::test]
    async fn test_consolidation_failure_is_fatal_without_retry() {
        // Calls 1-3 are chunks, call 4 is the merge.
        let mock = Arc::new(MockChat::failing_on(&[4]));
        let pipeline = pipeline_with(mock.clone());

        let transcript =
            "First sentence about the topic here. Second sentence about the topic. Third sentence closes it out.";
        let err = pipeline
            .summarize(transcript, &SummarizeOptions::default())
            .await
            .unwrap_err();

        // Baseline asymmetry: no retry for the merge phase.
        assert_eq!(mock.call_count(), 4);
        assert!(matches!(err, NotatError::Consolidation(_)));
    }

    #[tokio::test]
    async fn test_consolidation_retry_flag_extends_budget() {
        let mock = Arc::new(MockChat::failing_on(&[4, 5]));
        let mut settings = test_settings();
        settings.llm.retry_consolidation = true;
        let pipeline = SummaryPipeline::with_client(&settings, mock.clone()).unwrap();

        let transcript =
            "First sentence about the topic here. Second sentence about the topic. Third sentence closes it out.";
        let outcome = pipeline
            .summarize(transcript, &SummarizeOptions::default())
            .await
            .unwrap();

        // Merge failed twice, then succeeded on its third attempt.
        assert_eq!(mock.call_count(), 6);
        assert!(outcome.consolidated);
        assert_eq!(outcome.summary, "summary 6");
    }

    #[tokio::test]
    async fn test_notes_split_on_lines_and_trim() {
        let outcome = SummaryOutcome {
            summary: "First point\n\n  Second point  \n\nThird".to_string(),
            chunk_count: 1,
            consolidated: false,
            chunks: Vec::new(),
            total_tokens: None,
            elapsed: Duration::ZERO,
        };
        assert_eq!(outcome.notes(), vec!["First point", "Second point", "Third"]);
    }
}
