//! Main CLI parser and top-level argument handling.

use clap::Parser;

use crate::commands::Commands;

/// Command-line interface for the aigate gateway.
#[derive(Debug, Parser)]
#[command(name = "aigate")]
#[command(about = "HTTP gateway for LLM translation and summarization")]
#[command(version)]
pub struct Cli {
    /// Log level used when RUST_LOG is not set
    #[arg(long = "log-level", global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
