//! Model profiles and the registry that maps model identifiers to them.
//!
//! Every pipeline invocation resolves exactly one [`ModelProfile`] before any
//! network call is made, so an unknown model fails fast with zero upstream cost.

use crate::error::{NotatError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Operating parameters for one LLM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelProfile {
    /// Identifier sent to the chat-completion endpoint.
    pub model_id: String,
    /// Ceiling for generated tokens per request.
    pub max_output_tokens: u32,
    /// Sampling temperature for segment summarization, in [0, 1].
    pub temperature: f32,
    /// Maximum transcript characters per chunk.
    pub chunk_size_chars: usize,
}

impl ModelProfile {
    pub fn new(
        model_id: &str,
        max_output_tokens: u32,
        temperature: f32,
        chunk_size_chars: usize,
    ) -> Self {
        Self {
            model_id: model_id.to_string(),
            max_output_tokens,
            temperature,
            chunk_size_chars,
        }
    }

    /// Check the registry invariants for this profile.
    fn validate(&self) -> Result<()> {
        if self.model_id.trim().is_empty() {
            return Err(NotatError::Config("model_id must not be empty".to_string()));
        }
        if self.max_output_tokens == 0 {
            return Err(NotatError::Config(format!(
                "{}: max_output_tokens must be positive",
                self.model_id
            )));
        }
        if self.chunk_size_chars == 0 {
            return Err(NotatError::Config(format!(
                "{}: chunk_size_chars must be positive",
                self.model_id
            )));
        }
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(NotatError::Config(format!(
                "{}: temperature must be in [0, 1]",
                self.model_id
            )));
        }
        Ok(())
    }
}

/// Registry of model profiles, read-only at request time.
///
/// Constructed once and injected into the pipeline rather than living as
/// ambient global state, so tests can substitute fake profiles.
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    profiles: HashMap<String, ModelProfile>,
    default_model: String,
}

impl ModelRegistry {
    /// Registry seeded with the stock Groq-hosted models.
    pub fn with_defaults() -> Self {
        let mut registry = Self {
            profiles: HashMap::new(),
            default_model: "llama3-70b-8192".to_string(),
        };
        for profile in [
            ModelProfile::new("llama3-70b-8192", 8000, 0.7, 6000),
            ModelProfile::new("mixtral-8x7b-32768", 30000, 0.5, 20000),
            ModelProfile::new("llama3-8b-8192", 8000, 0.7, 6000),
        ] {
            // Stock profiles satisfy the invariants by construction.
            registry.profiles.insert(profile.model_id.clone(), profile);
        }
        registry
    }

    /// Register (or replace) a profile after validating its invariants.
    pub fn register(&mut self, profile: ModelProfile) -> Result<()> {
        profile.validate()?;
        self.profiles.insert(profile.model_id.clone(), profile);
        Ok(())
    }

    /// Change the default model; it must already be registered.
    pub fn set_default(&mut self, model_id: &str) -> Result<()> {
        if !self.profiles.contains_key(model_id) {
            return Err(NotatError::UnknownModel(model_id.to_string()));
        }
        self.default_model = model_id.to_string();
        Ok(())
    }

    /// Resolve a model identifier to its profile.
    pub fn lookup(&self, model_id: &str) -> Result<&ModelProfile> {
        self.profiles
            .get(model_id)
            .ok_or_else(|| NotatError::UnknownModel(model_id.to_string()))
    }

    /// The model used when the caller does not specify one.
    pub fn default_model_id(&self) -> &str {
        &self.default_model
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry() {
        let registry = ModelRegistry::with_defaults();
        let profile = registry.lookup(registry.default_model_id()).unwrap();
        assert_eq!(profile.model_id, "llama3-70b-8192");
        assert_eq!(profile.chunk_size_chars, 6000);
        assert!(profile.max_output_tokens > 0);
    }

    #[test]
    fn test_lookup_unknown_model() {
        let registry = ModelRegistry::with_defaults();
        let err = registry.lookup("nonexistent-model").unwrap_err();
        assert!(matches!(err, NotatError::UnknownModel(ref id) if id == "nonexistent-model"));
    }

    #[test]
    fn test_register_rejects_invalid_profile() {
        let mut registry = ModelRegistry::with_defaults();
        let err = registry
            .register(ModelProfile::new("bad-model", 0, 0.5, 6000))
            .unwrap_err();
        assert!(matches!(err, NotatError::Config(_)));

        let err = registry
            .register(ModelProfile::new("bad-model", 8000, 0.5, 0))
            .unwrap_err();
        assert!(matches!(err, NotatError::Config(_)));
    }

    #[test]
    fn test_register_and_set_default() {
        let mut registry = ModelRegistry::with_defaults();
        registry
            .register(ModelProfile::new("test-model", 1000, 0.2, 500))
            .unwrap();
        registry.set_default("test-model").unwrap();
        assert_eq!(registry.default_model_id(), "test-model");

        let err = registry.set_default("missing").unwrap_err();
        assert!(matches!(err, NotatError::UnknownModel(_)));
    }
}
