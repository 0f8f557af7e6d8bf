//! Transcript acquisition.
//!
//! The pipeline consumes one plain-text transcript string; where it comes
//! from is a collaborator concern behind the [`TranscriptSource`] trait.
//! Failures here are precondition failures (private video, missing captions,
//! unsupported URL) and are never retried by the pipeline.

mod hosted;

pub use hosted::HostedTranscriptApi;

use crate::error::Result;
use async_trait::async_trait;

/// Trait for transcript providers.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Fetch the full plain-text transcript for a video URL.
    async fn fetch_transcript(&self, url: &str) -> Result<String>;
}
