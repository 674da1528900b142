//! Flat CSV export of analysis records.

use std::{fs::File, io::Write, path::Path};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::analysis::AnalysisRecord;

/// One CSV row. Optional fields are written as empty cells.
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    comment_id: &'a str,
    label: Option<&'static str>,
    confidence: Option<f64>,
    category: &'static str,
    relevance_score: f64,
    section_id: Option<usize>,
    adjusted_score: Option<f64>,
    flagged: bool,
    error: Option<String>,
}

impl<'a> From<&'a AnalysisRecord> for ExportRow<'a> {
    fn from(record: &'a AnalysisRecord) -> Self {
        Self {
            comment_id: &record.comment_id,
            label: record.adjusted.map(|a| a.label.as_str()),
            confidence: record.raw_sentiment.map(|r| r.confidence),
            category: record.classification.category.as_str(),
            relevance_score: record.relevance.score,
            section_id: record.relevance.best_section_id,
            adjusted_score: record.adjusted.map(|a| a.score),
            flagged: record.adjusted.is_some_and(|a| a.flagged),
            error: record.error.as_ref().map(|e| e.to_string()),
        }
    }
}

pub fn to_writer<W: Write>(records: &[AnalysisRecord], writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for record in records {
        csv.serialize(ExportRow::from(record))?;
    }
    csv.flush()?;
    Ok(())
}

pub fn write_csv(records: &[AnalysisRecord], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    to_writer(records, file)?;
    info!(path = %path.display(), rows = records.len(), "wrote analysis export");
    Ok(())
}
