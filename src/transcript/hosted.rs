//! Hosted transcript API provider.
//!
//! Calls a RapidAPI-hosted YouTube transcript service and joins the returned
//! caption fragments into one plain-text transcript.

use super::TranscriptSource;
use crate::config::TranscriptSettings;
use crate::error::{NotatError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Transcript provider backed by a hosted caption API.
pub struct HostedTranscriptApi {
    client: reqwest::Client,
    endpoint: String,
    api_host: String,
    api_key: String,
    lang: String,
}

#[derive(Debug, Deserialize)]
struct TranscriptResponse {
    #[serde(default)]
    content: Vec<TranscriptFragment>,
}

#[derive(Debug, Deserialize)]
struct TranscriptFragment {
    text: String,
}

impl HostedTranscriptApi {
    /// Build a provider from settings, reading the API key from the
    /// configured environment variable.
    pub fn from_settings(settings: &TranscriptSettings) -> Result<Self> {
        let api_key = std::env::var(&settings.api_key_env).map_err(|_| {
            NotatError::Config(format!(
                "environment variable {} is not set",
                settings.api_key_env
            ))
        })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
            api_host: settings.api_host.clone(),
            api_key,
            lang: settings.lang.clone(),
        })
    }
}

#[async_trait]
impl TranscriptSource for HostedTranscriptApi {
    async fn fetch_transcript(&self, url: &str) -> Result<String> {
        debug!(%url, "fetching transcript");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("url", url),
                ("chunkSize", "500"),
                ("text", "false"),
                ("lang", self.lang.as_str()),
            ])
            .header("X-RapidAPI-Key", &self.api_key)
            .header("X-RapidAPI-Host", &self.api_host)
            .send()
            .await
            .map_err(|e| {
                warn!(%url, error = %e, "transcript fetch failed");
                NotatError::Transcript(
                    "could not reach the transcript service".to_string(),
                )
            })?;

        if !response.status().is_success() {
            let status = response.status();
            warn!(%url, %status, "transcript API returned an error");
            return Err(NotatError::Transcript(format!(
                "transcript service returned {}; check that the URL is valid and the video is supported",
                status
            )));
        }

        let body: TranscriptResponse = response.json().await.map_err(|e| {
            warn!(%url, error = %e, "invalid transcript payload");
            NotatError::Transcript("invalid transcript format from API".to_string())
        })?;

        if body.content.is_empty() {
            return Err(NotatError::Transcript(
                "no captions available for this video".to_string(),
            ));
        }

        let transcript = body
            .content
            .iter()
            .map(|fragment| fragment.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        Ok(transcript)
    }
}
