//! CLI command implementations.

mod config;
mod serve;
mod summarize;

pub use config::run_config;
pub use serve::run_serve;
pub use summarize::run_summarize;
