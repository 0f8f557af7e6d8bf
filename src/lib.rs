//! Notat - YouTube transcripts into structured notes
//!
//! A CLI tool and library that turns long video transcripts into readable
//! notes by driving an OpenAI-compatible chat-completion API.
//!
//! The name "Notat" comes from the Norwegian word for "note."
//!
//! # Overview
//!
//! Notat allows you to:
//! - Fetch a transcript for a YouTube video
//! - Summarize arbitrarily long transcripts chunk by chunk
//! - Merge partial summaries into one coherent document
//! - Serve the pipeline over HTTP for web frontends
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `models` - Model profiles and registry
//! - `chunking` - Sentence-aware transcript chunking
//! - `llm` - Chat-completion client abstraction
//! - `summarize` - Per-chunk summarization and consolidation
//! - `transcript` - Transcript acquisition
//! - `pipeline` - Pipeline orchestration
//!
//! # Example
//!
//! ```rust,no_run
//! use notat::config::Settings;
//! use notat::pipeline::SummaryPipeline;
//! use notat::summarize::SummarizeOptions;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let pipeline = SummaryPipeline::new(&settings)?;
//!
//!     let transcript = std::fs::read_to_string("transcript.txt")?;
//!     let outcome = pipeline
//!         .summarize(&transcript, &SummarizeOptions::default())
//!         .await?;
//!     println!("{}", outcome.summary);
//!
//!     Ok(())
//! }
//! ```

pub mod chunking;
pub mod cli;
pub mod config;
pub mod error;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod summarize;
pub mod transcript;

pub use error::{NotatError, Result};
