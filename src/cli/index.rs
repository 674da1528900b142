//! CLI entry-point for inspecting how a document is sectioned.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use tracing::instrument;

use crate::analysis::DocumentIndex;

/// Args for the `index` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Path to the legislative document (plain text).
    #[arg(long)]
    pub document: PathBuf,
    /// Number of top-weighted terms listed per section.
    #[arg(long, default_value_t = 5)]
    pub terms: usize,
}

#[instrument]
pub async fn run(args: Args) -> Result<()> {
    let text = tokio::fs::read_to_string(&args.document)
        .await
        .with_context(|| format!("read {}", args.document.display()))?;
    let title = args
        .document
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document");
    let index = DocumentIndex::build(title, &text)?;
    println!("{} ({:?}, {} sections)", index.title, index.strategy, index.len());
    for section in index.sections() {
        let terms: Vec<String> = section
            .term_vector
            .top_terms(args.terms)
            .into_iter()
            .map(|(term, weight)| format!("{term}={weight:.2}"))
            .collect();
        println!("[{}] {}: {}", section.id, section.label, terms.join(", "));
    }
    Ok(())
}
