//! Batch orchestration over an ordered set of comments.

use std::{collections::HashMap, sync::Arc, time::Duration};

use futures::stream::{self, StreamExt};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use super::{
    adjust,
    index::DocumentIndex,
    record::{AnalysisRecord, Comment},
    relevance::{RelevanceResult, RelevanceScorer},
    summary::BatchSummary,
};
use crate::{
    config::AnalysisConfig,
    error::{AnalysisError, RecordError},
    nlp::{
        classifier::{ClassificationResult, RuleTable},
        sentiment::{PrecomputedSentiment, RawSentiment, SentimentModel},
    },
};

/// Records in input order plus the summary folded over them.
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    pub records: Vec<AnalysisRecord>,
    pub summary: BatchSummary,
    /// The run was cancelled; unfinished comments carry a `Cancelled` marker.
    pub cancelled: bool,
}

/// Drives classification, relevance scoring and sentiment adjustment per comment.
#[derive(Clone)]
pub struct BatchOrchestrator {
    model: Arc<dyn SentimentModel>,
    rules: Arc<RuleTable>,
    config: AnalysisConfig,
}

impl std::fmt::Debug for BatchOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchOrchestrator")
            .field("model", &self.model.name())
            .field("rules", &self.rules.rules().len())
            .field("config", &self.config)
            .finish()
    }
}

impl BatchOrchestrator {
    /// Fails with `InvalidConfiguration` before any comment is touched.
    pub fn new(
        model: Arc<dyn SentimentModel>,
        config: AnalysisConfig,
    ) -> Result<Self, AnalysisError> {
        Ok(Self {
            model,
            rules: RuleTable::shared(),
            config: config.validated()?,
        })
    }

    /// Orchestrator fed by sentiment results computed elsewhere, keyed by comment id.
    pub fn with_precomputed(
        results: HashMap<String, RawSentiment>,
        config: AnalysisConfig,
    ) -> Result<Self, AnalysisError> {
        Self::new(Arc::new(PrecomputedSentiment::new(results)), config)
    }

    /// Replace the built-in rule table.
    pub fn with_rules(mut self, rules: RuleTable) -> Self {
        self.rules = Arc::new(rules);
        self
    }

    /// Analyse every comment. Exactly one record is produced per comment, in input order.
    #[instrument(skip_all, fields(comments = comments.len(), model = self.model.name()))]
    pub async fn run(
        &self,
        comments: &[Comment],
        index: Option<Arc<DocumentIndex>>,
        cancel: &CancellationToken,
    ) -> BatchOutcome {
        let index = index.filter(|idx| !idx.is_empty());
        if index.is_none() {
            info!("no document indexed; relevance fixed at zero");
        }
        let snapshot = index.as_deref();

        let mut indexed: Vec<(usize, AnalysisRecord)> = stream::iter(comments.iter().enumerate())
            .map(|(position, comment)| async move {
                (position, self.analyze(comment, snapshot, cancel).await)
            })
            .buffer_unordered(self.config.concurrency)
            .collect()
            .await;
        indexed.sort_by_key(|(position, _)| *position);
        let records: Vec<AnalysisRecord> = indexed.into_iter().map(|(_, record)| record).collect();

        let summary = BatchSummary::from_records(&records);
        let cancelled = cancel.is_cancelled();
        info!(
            total = summary.count_total,
            failed = summary.count_failed,
            cancelled,
            mean_relevance = summary.mean_relevance_score,
            "batch complete"
        );
        BatchOutcome {
            records,
            summary,
            cancelled,
        }
    }

    async fn analyze(
        &self,
        comment: &Comment,
        index: Option<&DocumentIndex>,
        cancel: &CancellationToken,
    ) -> AnalysisRecord {
        if let Some(reason) = malformed_reason(&comment.raw_text) {
            warn!(comment_id = %comment.id, %reason, "rejecting malformed comment");
            return AnalysisRecord::failed(
                &comment.id,
                ClassificationResult::other(),
                RelevanceResult::unscored(),
                RecordError::MalformedComment { reason },
            );
        }

        let classification = self.rules.classify(&comment.raw_text);
        let relevance = match index {
            Some(index) => {
                RelevanceScorer::new(index, self.config.keyword_boost).score_text(&comment.raw_text)
            }
            None => RelevanceResult::unscored(),
        };

        if cancel.is_cancelled() {
            return AnalysisRecord::failed(
                &comment.id,
                classification,
                relevance,
                RecordError::Cancelled,
            );
        }

        match self.infer(comment, cancel).await {
            Ok(raw) => {
                let adjusted = adjust::adjust(
                    raw,
                    &relevance,
                    &classification,
                    self.config.low_relevance_threshold,
                );
                debug!(
                    comment_id = %comment.id,
                    category = %classification.category,
                    relevance = relevance.score,
                    label = %adjusted.label,
                    "analysed comment"
                );
                AnalysisRecord {
                    comment_id: comment.id.clone(),
                    raw_sentiment: Some(raw),
                    classification,
                    relevance,
                    adjusted: Some(adjusted),
                    error: None,
                }
            }
            Err(error) => {
                warn!(comment_id = %comment.id, %error, "comment analysis failed");
                AnalysisRecord::failed(&comment.id, classification, relevance, error)
            }
        }
    }

    async fn infer(
        &self,
        comment: &Comment,
        cancel: &CancellationToken,
    ) -> Result<RawSentiment, RecordError> {
        let timeout = self.config.inference_timeout;
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(RecordError::Cancelled),
            outcome = tokio::time::timeout(timeout, self.model.infer(&comment.id, &comment.raw_text)) => {
                match outcome {
                    Ok(result) => result.map_err(RecordError::from),
                    Err(_) => Err(RecordError::Timeout { after_ms: millis(timeout) }),
                }
            }
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Text the pipeline cannot process: embedded control characters or decoding damage.
pub fn malformed_reason(text: &str) -> Option<String> {
    if let Some(c) = text.chars().find(|c| c.is_control() && !c.is_whitespace()) {
        return Some(format!("control character U+{:04X}", c as u32));
    }
    if text.contains('\u{FFFD}') {
        return Some("contains replacement character from invalid encoding".to_string());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_characters_are_malformed() {
        assert!(malformed_reason("ok\u{0}").is_some());
        assert!(malformed_reason("bad \u{FFFD} bytes").is_some());
        assert!(malformed_reason("tabs\tand\nnewlines are fine").is_none());
        assert!(malformed_reason("").is_none());
    }

    #[test]
    fn invalid_configuration_is_rejected_up_front() {
        let config = AnalysisConfig {
            low_relevance_threshold: -1.0,
            ..AnalysisConfig::default()
        };
        let err = BatchOrchestrator::with_precomputed(HashMap::new(), config).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidConfiguration(_)));
    }
}
