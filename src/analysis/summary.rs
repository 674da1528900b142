//! Batch summary statistics, always derived by folding over records.

use indexmap::IndexMap;
use serde::Serialize;

use super::{adjust::AdjustedLabel, record::AnalysisRecord, relevance::RelevanceBand};
use crate::nlp::classifier::Category;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub count_total: usize,
    pub count_failed: usize,
    /// Every category is present, zero counts included.
    pub count_by_category: IndexMap<Category, usize>,
    /// Adjusted labels of successful records.
    pub count_by_sentiment_label: IndexMap<AdjustedLabel, usize>,
    pub count_by_relevance_band: IndexMap<RelevanceBand, usize>,
    /// Suggestions and questions.
    pub count_constructive: usize,
    /// Mean best-section relevance over successful records.
    pub mean_relevance_score: f64,
    /// Mean raw model confidence over successful records.
    pub mean_confidence: f64,
}

impl BatchSummary {
    pub fn from_records(records: &[AnalysisRecord]) -> Self {
        let mut count_by_category: IndexMap<Category, usize> =
            Category::ALL.iter().map(|c| (*c, 0)).collect();
        let mut count_by_sentiment_label: IndexMap<AdjustedLabel, usize> =
            AdjustedLabel::ALL.iter().map(|l| (*l, 0)).collect();
        let mut count_by_relevance_band: IndexMap<RelevanceBand, usize> =
            RelevanceBand::ALL.iter().map(|b| (*b, 0)).collect();

        let mut count_failed = 0;
        let mut count_constructive = 0;
        let mut relevance_sum = 0.0;
        let mut confidence_sum = 0.0;
        let mut succeeded = 0usize;

        for record in records {
            *count_by_category
                .entry(record.classification.category)
                .or_insert(0) += 1;
            *count_by_relevance_band
                .entry(record.relevance.band)
                .or_insert(0) += 1;
            if record.classification.category.is_constructive() {
                count_constructive += 1;
            }
            match (&record.raw_sentiment, &record.adjusted, &record.error) {
                (Some(raw), Some(adjusted), None) => {
                    *count_by_sentiment_label.entry(adjusted.label).or_insert(0) += 1;
                    relevance_sum += record.relevance.score;
                    confidence_sum += raw.confidence;
                    succeeded += 1;
                }
                _ => count_failed += 1,
            }
        }

        let mean = |sum: f64| {
            if succeeded == 0 {
                0.0
            } else {
                sum / succeeded as f64
            }
        };

        Self {
            count_total: records.len(),
            count_failed,
            count_by_category,
            count_by_sentiment_label,
            count_by_relevance_band,
            count_constructive,
            mean_relevance_score: mean(relevance_sum),
            mean_confidence: mean(confidence_sum),
        }
    }

    /// Share of records that completed without error, in percent.
    pub fn success_rate(&self) -> f64 {
        if self.count_total == 0 {
            return 0.0;
        }
        (self.count_total - self.count_failed) as f64 / self.count_total as f64 * 100.0
    }
}
