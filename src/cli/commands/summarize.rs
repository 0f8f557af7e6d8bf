//! The `summarize` command: transcript in, notes out.

use crate::cli::Output;
use crate::config::Settings;
use crate::pipeline::SummaryPipeline;
use crate::summarize::SummarizeOptions;
use crate::transcript::{HostedTranscriptApi, TranscriptSource};
use std::time::Duration;

#[allow(clippy::too_many_arguments)]
pub async fn run_summarize(
    input: &str,
    file: bool,
    model: Option<String>,
    retries: Option<u32>,
    timeout: Option<u64>,
    no_consolidate: bool,
    output: Option<String>,
    settings: Settings,
) -> anyhow::Result<()> {
    let transcript = if file {
        std::fs::read_to_string(input)?
    } else {
        let source = HostedTranscriptApi::from_settings(&settings.transcript)?;
        let spinner = Output::spinner("Fetching transcript...");
        let result = source.fetch_transcript(input).await;
        spinner.finish_and_clear();
        result?
    };

    let pipeline = SummaryPipeline::new(&settings)?;
    let options = SummarizeOptions {
        model,
        retries,
        timeout: timeout.map(Duration::from_secs),
        consolidate: !no_consolidate,
    };

    let spinner = Output::spinner(&format!(
        "Summarizing {} characters...",
        transcript.chars().count()
    ));
    let result = pipeline.summarize(&transcript, &options).await;
    spinner.finish_and_clear();
    let outcome = result?;

    Output::success(&format!(
        "Summarized {} chunk{} in {:.1}s{}",
        outcome.chunk_count,
        if outcome.chunk_count == 1 { "" } else { "s" },
        outcome.elapsed.as_secs_f64(),
        match outcome.total_tokens {
            Some(tokens) => format!(" ({} tokens)", tokens),
            None => String::new(),
        },
    ));

    match output {
        Some(path) => {
            std::fs::write(&path, &outcome.summary)?;
            Output::info(&format!("Summary written to {}", path));
        }
        None => {
            Output::header("Notes");
            for (i, note) in outcome.notes().iter().enumerate() {
                Output::note(i + 1, note);
            }
        }
    }

    Ok(())
}
