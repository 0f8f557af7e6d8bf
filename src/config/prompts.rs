//! Prompt templates for Notat.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub summarize: SummarizePrompts,
    pub consolidate: ConsolidatePrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: std::collections::HashMap<String, String>,
}

/// Prompts for per-chunk segment summarization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizePrompts {
    pub system: String,
    pub user: String,
}

impl Default for SummarizePrompts {
    fn default() -> Self {
        Self {
            system: "You are a professional content summarizer. Be concise yet thorough."
                .to_string(),

            user: r#"Continue summarizing this YouTube transcript (part {{part}}/{{total}}):
Focus on key points, examples, and insights. Maintain consistent formatting.

Transcript Part:
{{chunk}}"#
                .to_string(),
        }
    }
}

/// Prompts for merging partial summaries into one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsolidatePrompts {
    pub system: String,
    pub user: String,
}

impl Default for ConsolidatePrompts {
    fn default() -> Self {
        Self {
            system: "You are an editor combining multiple summary sections into one cohesive summary."
                .to_string(),

            user: r#"Combine these summaries into one:

{{sections}}"#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&std::collections::HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let summarize_path = custom_path.join("summarize.toml");
            if summarize_path.exists() {
                let content = std::fs::read_to_string(&summarize_path)?;
                prompts.summarize = toml::from_str(&content)?;
            }

            let consolidate_path = custom_path.join("consolidate.toml");
            if consolidate_path.exists() {
                let content = std::fs::read_to_string(&consolidate_path)?;
                prompts.consolidate = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &std::collections::HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(
        &self,
        template: &str,
        vars: &std::collections::HashMap<String, String>,
    ) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompts() {
        let prompts = Prompts::default();
        assert!(!prompts.summarize.system.is_empty());
        assert!(prompts.summarize.user.contains("{{chunk}}"));
        assert!(prompts.consolidate.user.contains("{{sections}}"));
    }

    #[test]
    fn test_render_template() {
        let template = "Summarize part {{part}}/{{total}}: {{chunk}}";
        let mut vars = std::collections::HashMap::new();
        vars.insert("part".to_string(), "2".to_string());
        vars.insert("total".to_string(), "3".to_string());
        vars.insert("chunk".to_string(), "hello".to_string());

        let result = Prompts::render(template, &vars);
        assert_eq!(result, "Summarize part 2/3: hello");
    }

    #[test]
    fn test_custom_variables_are_overridden_by_provided() {
        let mut prompts = Prompts::default();
        prompts
            .variables
            .insert("part".to_string(), "ignored".to_string());

        let mut vars = std::collections::HashMap::new();
        vars.insert("part".to_string(), "1".to_string());

        let result = prompts.render_with_custom("part {{part}}", &vars);
        assert_eq!(result, "part 1");
    }
}
