//! Error types for Notat.

use thiserror::Error;

/// Library-level error type for Notat operations.
#[derive(Error, Debug)]
pub enum NotatError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown model: {0}")]
    UnknownModel(String),

    #[error("Transcript unavailable: {0}")]
    Transcript(String),

    #[error("LLM request timed out: {0}")]
    UpstreamTimeout(String),

    #[error("LLM API error: {0}")]
    UpstreamApi(String),

    #[error("Chunk {chunk}/{total} failed after {attempts} attempts: {last_error}")]
    ChunkExhausted {
        chunk: usize,
        total: usize,
        attempts: u32,
        last_error: String,
    },

    #[error("Consolidation failed: {0}")]
    Consolidation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl NotatError {
    /// Whether a retry could plausibly succeed.
    ///
    /// Only upstream failures (timeout, transport, API) are worth retrying;
    /// input and configuration errors are deterministic.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            NotatError::UpstreamTimeout(_) | NotatError::UpstreamApi(_) | NotatError::Http(_)
        )
    }
}

/// Result type alias for Notat operations.
pub type Result<T> = std::result::Result<T, NotatError>;
