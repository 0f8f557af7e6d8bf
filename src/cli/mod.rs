//! CLI module for Notat.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Notat - YouTube transcripts into structured notes
///
/// A CLI tool that turns long video transcripts into readable notes.
/// The name "Notat" comes from the Norwegian word for "note."
#[derive(Parser, Debug)]
#[command(name = "notat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Summarize a YouTube video or a transcript file into notes
    Summarize {
        /// YouTube URL, or a path to a transcript text file with --file
        input: String,

        /// Treat the input as a path to a plain-text transcript file
        #[arg(short, long)]
        file: bool,

        /// Model to use for summarization
        #[arg(short, long)]
        model: Option<String>,

        /// Attempts per chunk before giving up
        #[arg(long)]
        retries: Option<u32>,

        /// Per-request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Skip the consolidation phase and join partial summaries as-is
        #[arg(long)]
        no_consolidate: bool,

        /// Write the summary to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Run the HTTP API server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value_t = 3001)]
        port: u16,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the active configuration
    Show,
    /// Print the configuration file path
    Path,
    /// Write a default configuration file
    Init,
}
