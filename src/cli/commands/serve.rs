//! HTTP API server for integration with web frontends.
//!
//! Exposes the summarization pipeline as a REST endpoint.

use crate::cli::Output;
use crate::config::Settings;
use crate::error::NotatError;
use crate::pipeline::SummaryPipeline;
use crate::summarize::SummarizeOptions;
use crate::transcript::{HostedTranscriptApi, TranscriptSource};
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::error;

/// Shared application state.
struct AppState {
    pipeline: SummaryPipeline,
    settings: Settings,
}

/// Run the HTTP API server.
pub async fn run_serve(host: &str, port: u16, settings: Settings) -> anyhow::Result<()> {
    let pipeline = SummaryPipeline::new(&settings)?;

    let state = Arc::new(AppState { pipeline, settings });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health))
        .route("/api/summarize", post(summarize))
        .layer(cors)
        .with_state(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Notat API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("Summarize", "POST /api/summarize");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct SummarizeRequest {
    /// YouTube URL; the transcript is fetched from the configured provider.
    url: Option<String>,
    /// Raw transcript text, bypassing transcript acquisition.
    transcript: Option<String>,
    /// Model override.
    model: Option<String>,
    #[serde(default = "default_consolidate")]
    consolidate: bool,
}

fn default_consolidate() -> bool {
    true
}

#[derive(Serialize)]
struct SummarizeResponse {
    notes: Vec<String>,
    chunk_count: usize,
    consolidated: bool,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn summarize(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SummarizeRequest>,
) -> impl IntoResponse {
    let transcript = match (&req.transcript, &req.url) {
        (Some(text), _) => text.clone(),
        (None, Some(url)) => {
            let source = match HostedTranscriptApi::from_settings(&state.settings.transcript) {
                Ok(source) => source,
                Err(e) => return error_response(e),
            };
            match source.fetch_transcript(url).await {
                Ok(text) => text,
                Err(e) => return error_response(e),
            }
        }
        (None, None) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "provide either \"url\" or \"transcript\"".to_string(),
                }),
            )
                .into_response();
        }
    };

    let options = SummarizeOptions {
        model: req.model.clone(),
        consolidate: req.consolidate,
        ..Default::default()
    };

    match state.pipeline.summarize(&transcript, &options).await {
        Ok(outcome) => Json(SummarizeResponse {
            notes: outcome.notes(),
            chunk_count: outcome.chunk_count,
            consolidated: outcome.consolidated,
        })
        .into_response(),
        Err(e) => error_response(e),
    }
}

/// Map a pipeline error onto an HTTP response.
///
/// Caller mistakes get an actionable 400; anything upstream is logged in
/// detail server-side and reported as a single generic failure so that
/// credentials and raw causes never reach the client.
fn error_response(error: NotatError) -> axum::response::Response {
    match error {
        NotatError::InvalidInput(_) | NotatError::UnknownModel(_) | NotatError::Transcript(_) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: error.to_string(),
            }),
        )
            .into_response(),
        other => {
            error!(error = %other, "summarization failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Something went wrong".to_string(),
                }),
            )
                .into_response()
        }
    }
}
