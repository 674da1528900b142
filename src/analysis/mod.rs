//! Document-aware analysis core: indexing, relevance, adjustment and batch orchestration.

pub mod adjust;
pub mod batch;
pub mod index;
pub mod record;
pub mod relevance;
pub mod summary;

pub use adjust::{AdjustedLabel, AdjustedSentiment};
pub use batch::{BatchOrchestrator, BatchOutcome};
pub use index::{DocumentIndex, Section, TermVector};
pub use record::{AnalysisRecord, Comment};
pub use relevance::{RelevanceBand, RelevanceResult, RelevanceScorer};
pub use summary::BatchSummary;

use tracing::warn;

use crate::error::AnalysisError;

/// Index a document, degrading to "no document" mode when it has no usable text.
pub fn index_or_degrade(title: &str, text: Option<&str>) -> Option<DocumentIndex> {
    let text = text?;
    match DocumentIndex::build(title, text) {
        Ok(index) => Some(index),
        Err(AnalysisError::EmptyDocument) => {
            warn!(%title, "document is empty; continuing without relevance scoring");
            None
        }
        Err(err) => {
            warn!(%title, error = %err, "document indexing failed; continuing without it");
            None
        }
    }
}
