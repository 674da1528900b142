//! Error kinds surfaced by the analysis core.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fatal errors raised while indexing or configuring an analysis run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("document contains no usable text")]
    EmptyDocument,

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Failure reported by an external inference collaborator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    #[error("input rejected by model: {0}")]
    Rejected(String),

    #[error("inference backend unavailable: {0}")]
    Unavailable(String),

    #[error("no sentiment supplied for comment {0}")]
    Missing(String),
}

/// Per-comment failure marker carried inside an `AnalysisRecord`.
///
/// These never abort a batch; the record is still emitted so every input
/// comment maps to exactly one output record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordError {
    #[error("malformed comment: {reason}")]
    MalformedComment { reason: String },

    #[error("sentiment inference timed out after {after_ms} ms")]
    Timeout { after_ms: u64 },

    #[error("cancelled before completion")]
    Cancelled,
}

impl RecordError {
    /// Short machine-friendly tag used in exports.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedComment { .. } => "malformed_comment",
            Self::Timeout { .. } => "timeout",
            Self::Cancelled => "cancelled",
        }
    }
}

impl From<InferenceError> for RecordError {
    fn from(value: InferenceError) -> Self {
        RecordError::MalformedComment {
            reason: value.to_string(),
        }
    }
}
