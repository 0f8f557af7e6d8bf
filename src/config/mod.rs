//! Configuration module for Notat.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{ConsolidatePrompts, Prompts, SummarizePrompts};
pub use settings::{
    GeneralSettings, LlmSettings, PromptSettings, Settings, TranscriptSettings,
};
