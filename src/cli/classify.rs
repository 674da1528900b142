//! CLI entry-point for classifying one comment.

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::instrument;

use crate::nlp::classifier;

/// Args for the `classify` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Comment text.
    #[arg(long)]
    pub text: String,
}

#[instrument]
pub fn run(args: Args) -> Result<()> {
    let result = classifier::classify(&args.text);
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
