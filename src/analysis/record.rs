//! Input comments and per-comment analysis records.

use serde::{Deserialize, Serialize};

use super::{adjust::AdjustedSentiment, relevance::RelevanceResult};
use crate::{
    error::RecordError,
    nlp::{classifier::ClassificationResult, sentiment::RawSentiment},
};

/// Caller-supplied comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub raw_text: String,
}

impl Comment {
    pub fn new(id: impl Into<String>, raw_text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            raw_text: raw_text.into(),
        }
    }
}

/// One output unit per input comment, successful or not.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisRecord {
    pub comment_id: String,
    pub raw_sentiment: Option<RawSentiment>,
    pub classification: ClassificationResult,
    pub relevance: RelevanceResult,
    pub adjusted: Option<AdjustedSentiment>,
    pub error: Option<RecordError>,
}

impl AnalysisRecord {
    /// Record for a comment that could not be analysed.
    pub fn failed(
        comment_id: impl Into<String>,
        classification: ClassificationResult,
        relevance: RelevanceResult,
        error: RecordError,
    ) -> Self {
        Self {
            comment_id: comment_id.into(),
            raw_sentiment: None,
            classification,
            relevance,
            adjusted: None,
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}
