//! Command-line interface wiring for consult-lens.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::Settings;

pub mod analyze;
pub mod classify;
pub mod index;
pub mod summarize;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(author, version, about = "Document-aware consultation comment analysis", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Dispatch the selected sub-command.
    pub async fn dispatch(self, settings: Settings) -> Result<()> {
        match self.command {
            Commands::Index(args) => index::run(args).await,
            Commands::Classify(args) => classify::run(args),
            Commands::Analyze(args) => analyze::run(args, settings).await,
            Commands::Summarize(args) => summarize::run(args).await,
        }
    }
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Split a document into sections and show their key terms.
    Index(index::Args),
    /// Classify a single comment.
    Classify(classify::Args),
    /// Analyse a CSV of comments, optionally against a document.
    Analyze(analyze::Args),
    /// Produce an extractive summary of a text file.
    Summarize(summarize::Args),
}
