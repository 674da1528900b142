//! CLI entry-point for batch analysis of consultation comments.

use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args as ClapArgs;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use crate::{
    analysis::{self, BatchOrchestrator},
    config::Settings,
    data::{comments, export, report},
    nlp::sentiment::{HttpSentiment, LexiconSentiment, PrecomputedSentiment, SentimentModel},
};

/// Args for the `analyze` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// CSV file holding the comments.
    #[arg(long)]
    pub comments: PathBuf,
    /// Column with the comment text; detected when omitted.
    #[arg(long)]
    pub column: Option<String>,
    /// Legislative document used for relevance scoring.
    #[arg(long)]
    pub document: Option<PathBuf>,
    /// Document title shown in the report.
    #[arg(long)]
    pub title: Option<String>,
    /// Sentiment inference endpoint; overrides SENTIMENT_URL.
    #[arg(long)]
    pub sentiment_url: Option<String>,
    /// Export path (defaults to OUTPUTS_DIR/analysis.csv).
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// Report path (defaults to OUTPUTS_DIR/report.txt).
    #[arg(long)]
    pub report: Option<PathBuf>,
    /// Print the full outcome as JSON instead of the text report.
    #[arg(long)]
    pub json: bool,
    #[arg(long)]
    pub concurrency: Option<usize>,
    #[arg(long)]
    pub timeout_ms: Option<u64>,
    /// Low-relevance threshold in [0, 1].
    #[arg(long, allow_negative_numbers = true)]
    pub threshold: Option<f64>,
    /// Legal keyword boost for comment vectors.
    #[arg(long)]
    pub boost: Option<f64>,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let mut config = settings.analysis_config();
    if let Some(concurrency) = args.concurrency {
        config.concurrency = concurrency;
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config.inference_timeout = Duration::from_millis(timeout_ms);
    }
    if let Some(threshold) = args.threshold {
        config.low_relevance_threshold = threshold;
    }
    if let Some(boost) = args.boost {
        config.keyword_boost = boost;
    }
    let config = config.validated()?;

    let loaded = comments::load_csv(&args.comments, args.column.as_deref())?;

    let document_text = match &args.document {
        Some(path) => Some(
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("read {}", path.display()))?,
        ),
        None => None,
    };
    let title = args
        .title
        .clone()
        .or_else(|| {
            args.document
                .as_ref()
                .and_then(|p| p.file_stem())
                .and_then(|s| s.to_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| "Main Document".to_string());
    let index = analysis::index_or_degrade(&title, document_text.as_deref()).map(Arc::new);

    let sentiment_url = args.sentiment_url.clone().or(settings.sentiment_url.clone());
    let model: Arc<dyn SentimentModel> = match sentiment_url {
        Some(url) => Arc::new(HttpSentiment::new(url, config.inference_timeout)?),
        None if !loaded.sentiments.is_empty() => {
            Arc::new(PrecomputedSentiment::new(loaded.sentiments.clone()))
        }
        None => {
            warn!("no sentiment source configured; using lexicon fallback");
            Arc::new(LexiconSentiment)
        }
    };
    info!(model = model.name(), "sentiment source selected");

    let orchestrator = BatchOrchestrator::new(model, config)?;
    let cancel = CancellationToken::new();
    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupt received; cancelling remaining comments");
                cancel.cancel();
            }
        })
    };
    let outcome = orchestrator
        .run(&loaded.comments, index.clone(), &cancel)
        .await;
    interrupt.abort();

    let out_path = args
        .out
        .clone()
        .unwrap_or_else(|| settings.join_output("analysis.csv"));
    export::write_csv(&outcome.records, &out_path)?;

    let rendered = report::render(&outcome, &loaded.comments, index.as_deref(), Utc::now());
    let report_path = args
        .report
        .clone()
        .unwrap_or_else(|| settings.join_output("report.txt"));
    if let Some(parent) = report_path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&report_path, &rendered)
        .await
        .with_context(|| format!("write {}", report_path.display()))?;
    info!(path = %report_path.display(), "wrote report");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!("{rendered}");
    }
    Ok(())
}
