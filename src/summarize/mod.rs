//! Two-phase transcript summarization.
//!
//! Map phase: one LLM call per transcript chunk ([`SegmentSummarizer`]).
//! Reduce phase: one merge call over all partial summaries ([`Consolidator`]),
//! skipped when there is only one chunk.

mod consolidate;
mod retry;
mod segment;

pub use consolidate::{Consolidation, Consolidator, CONSOLIDATION_TEMPERATURE};
pub use retry::RetryPolicy;
pub use segment::{ChunkSummary, SegmentSummarizer};

use std::time::Duration;

/// Per-invocation options for [`crate::pipeline::SummaryPipeline::summarize`].
///
/// Unset fields fall back to configuration defaults.
#[derive(Debug, Clone)]
pub struct SummarizeOptions {
    /// Model identifier; registry default when None.
    pub model: Option<String>,
    /// Attempts per chunk.
    pub retries: Option<u32>,
    /// Per-request timeout.
    pub timeout: Option<Duration>,
    /// Merge partial summaries with a second LLM phase. When false,
    /// multi-chunk results are the partials joined by blank lines.
    pub consolidate: bool,
}

impl Default for SummarizeOptions {
    fn default() -> Self {
        Self {
            model: None,
            retries: None,
            timeout: None,
            consolidate: true,
        }
    }
}
