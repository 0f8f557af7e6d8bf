//! Configuration settings for Notat.

use crate::models::ModelProfile;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub llm: LlmSettings,
    pub transcript: TranscriptSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// LLM endpoint and pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Base URL of the OpenAI-compatible chat-completions API.
    pub api_base: String,
    /// Environment variable holding the bearer key.
    pub api_key_env: String,
    /// Default model; falls back to the registry default when unset.
    pub default_model: Option<String>,
    /// Attempts per chunk before the pipeline aborts.
    pub retries: u32,
    /// Per-request timeout in seconds.
    pub timeout_seconds: u64,
    /// Linear backoff unit in seconds (wait = attempt * unit).
    pub backoff_seconds: u64,
    /// Apply the per-chunk retry policy to the consolidation call as well.
    /// Off by default: consolidation is a single attempt.
    pub retry_consolidation: bool,
    /// Additional model profiles to register alongside the stock ones.
    pub extra_profiles: Vec<ModelProfile>,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_base: "https://api.groq.com/openai/v1".to_string(),
            api_key_env: "GROQ_API_KEY".to_string(),
            default_model: None,
            retries: 3,
            timeout_seconds: 45,
            backoff_seconds: 5,
            retry_consolidation: false,
            extra_profiles: Vec::new(),
        }
    }
}

/// Transcript provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptSettings {
    /// Hosted transcript API endpoint.
    pub endpoint: String,
    /// Host header expected by the hosted API.
    pub api_host: String,
    /// Environment variable holding the provider key.
    pub api_key_env: String,
    /// Preferred caption language.
    pub lang: String,
    /// Fetch timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for TranscriptSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://youtube-transcripts.p.rapidapi.com/youtube/transcript".to_string(),
            api_host: "youtube-transcripts.p.rapidapi.com".to_string(),
            api_key_env: "RAPIDAPI_KEY".to_string(),
            lang: "en".to_string(),
            timeout_seconds: 20,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::NotatError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("notat")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }
}
