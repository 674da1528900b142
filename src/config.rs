//! Runtime configuration utilities for consult-lens.

use std::{
    env,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use anyhow::Context;
use serde::Deserialize;

use crate::error::AnalysisError;

pub const DEFAULT_LOW_RELEVANCE_THRESHOLD: f64 = 0.1;
pub const DEFAULT_KEYWORD_BOOST: f64 = 1.5;
pub const DEFAULT_CONCURRENCY: usize = 4;
pub const DEFAULT_INFERENCE_TIMEOUT_MS: u64 = 5_000;

/// Application configuration resolved from `.env` and defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Root folder for exports and reports.
    pub outputs_dir: PathBuf,
    /// Relevance below this value is clamped when adjusting sentiment.
    pub low_relevance_threshold: f64,
    /// Multiplier applied to legal keywords in comment vectors.
    pub keyword_boost: f64,
    /// Number of comments analysed concurrently.
    pub concurrency: usize,
    /// Per-comment sentiment inference timeout in milliseconds.
    pub inference_timeout_ms: u64,
    /// Optional sentiment inference endpoint.
    pub sentiment_url: Option<String>,
}

impl Settings {
    /// Load configuration from environment with reasonable defaults.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let outputs_dir = env::var("OUTPUTS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./outputs"));
        let low_relevance_threshold =
            parse_var("LOW_RELEVANCE_THRESHOLD", DEFAULT_LOW_RELEVANCE_THRESHOLD)?;
        let keyword_boost = parse_var("KEYWORD_BOOST", DEFAULT_KEYWORD_BOOST)?;
        let concurrency = parse_var("BATCH_CONCURRENCY", DEFAULT_CONCURRENCY)?;
        let inference_timeout_ms =
            parse_var("INFERENCE_TIMEOUT_MS", DEFAULT_INFERENCE_TIMEOUT_MS)?;
        let sentiment_url = env::var("SENTIMENT_URL").ok().filter(|v| !v.is_empty());

        std::fs::create_dir_all(&outputs_dir).context("creating outputs dir")?;

        Ok(Self {
            outputs_dir,
            low_relevance_threshold,
            keyword_boost,
            concurrency,
            inference_timeout_ms,
            sentiment_url,
        })
    }

    /// Convenience helper for derived output path segments.
    pub fn join_output<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.outputs_dir.join(path)
    }

    /// Analysis parameters from the environment. Validate after applying overrides.
    pub fn analysis_config(&self) -> AnalysisConfig {
        AnalysisConfig {
            low_relevance_threshold: self.low_relevance_threshold,
            keyword_boost: self.keyword_boost,
            concurrency: self.concurrency,
            inference_timeout: Duration::from_millis(self.inference_timeout_ms),
        }
    }
}

fn parse_var<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("parsing {key}={raw}")),
        Err(_) => Ok(default),
    }
}

/// Parameters that shape scoring and batch execution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisConfig {
    pub low_relevance_threshold: f64,
    pub keyword_boost: f64,
    pub concurrency: usize,
    pub inference_timeout: Duration,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            low_relevance_threshold: DEFAULT_LOW_RELEVANCE_THRESHOLD,
            keyword_boost: DEFAULT_KEYWORD_BOOST,
            concurrency: DEFAULT_CONCURRENCY,
            inference_timeout: Duration::from_millis(DEFAULT_INFERENCE_TIMEOUT_MS),
        }
    }
}

impl AnalysisConfig {
    /// Reject parameter combinations before any comment is processed.
    pub fn validated(self) -> Result<Self, AnalysisError> {
        let threshold = self.low_relevance_threshold;
        if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
            return Err(AnalysisError::InvalidConfiguration(format!(
                "low relevance threshold must lie in [0, 1], got {threshold}"
            )));
        }
        if !self.keyword_boost.is_finite() || self.keyword_boost <= 0.0 {
            return Err(AnalysisError::InvalidConfiguration(format!(
                "keyword boost must be positive, got {}",
                self.keyword_boost
            )));
        }
        if self.concurrency == 0 {
            return Err(AnalysisError::InvalidConfiguration(
                "concurrency must be at least 1".into(),
            ));
        }
        if self.inference_timeout.is_zero() {
            return Err(AnalysisError::InvalidConfiguration(
                "inference timeout must be non-zero".into(),
            ));
        }
        Ok(self)
    }
}
