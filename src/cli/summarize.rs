//! CLI entry-point for extractive summaries.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use crate::nlp::summarize::{ExtractiveSummarizer, Summarizer};

/// Args for the `summarize` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Text file to summarise.
    #[arg(long)]
    pub input: PathBuf,
    /// Maximum summary length in words.
    #[arg(long, default_value_t = 150)]
    pub max_len: usize,
    /// Minimum summary length in words.
    #[arg(long, default_value_t = 50)]
    pub min_len: usize,
}

#[instrument]
pub async fn run(args: Args) -> Result<()> {
    let text = tokio::fs::read_to_string(&args.input)
        .await
        .with_context(|| format!("read {}", args.input.display()))?;
    let summary = ExtractiveSummarizer.summarize(&text, args.max_len, args.min_len)?;
    info!(words = summary.split_whitespace().count(), "generated summary");
    println!("{summary}");
    Ok(())
}
