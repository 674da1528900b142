//! Plain-text analysis report.

use std::{
    collections::BTreeMap,
    fmt::{self, Write as _},
};

use chrono::{DateTime, Utc};

use crate::{
    analysis::{AdjustedLabel, BatchOutcome, Comment, DocumentIndex},
    nlp::keywords,
};

/// Relevance above which a comment counts toward section feedback.
pub const RELEVANT_SCORE: f64 = 0.3;

const TOP_SECTIONS: usize = 5;
const TOP_KEYWORDS: usize = 10;

/// Render the report for a finished batch.
pub fn render(
    outcome: &BatchOutcome,
    comments: &[Comment],
    index: Option<&DocumentIndex>,
    generated_at: DateTime<Utc>,
) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_report(&mut out, outcome, comments, index, generated_at);
    out
}

fn write_report(
    out: &mut String,
    outcome: &BatchOutcome,
    comments: &[Comment],
    index: Option<&DocumentIndex>,
    generated_at: DateTime<Utc>,
) -> fmt::Result {
    let summary = &outcome.summary;
    let rule = "-".repeat(30);

    writeln!(out, "eConsultation Sentiment Analysis Report")?;
    writeln!(out, "{}", "=".repeat(50))?;
    writeln!(out, "Generated on: {}", generated_at.format("%Y-%m-%d %H:%M:%S"))?;
    if let Some(index) = index {
        writeln!(out, "Document: {} ({} sections)", index.title, index.len())?;
    }
    writeln!(out, "Total Comments Analyzed: {}", summary.count_total)?;
    writeln!(
        out,
        "Failed: {} (success rate {:.1}%)",
        summary.count_failed,
        summary.success_rate()
    )?;
    if outcome.cancelled {
        writeln!(out, "Run was cancelled; results are partial.")?;
    }
    writeln!(out)?;

    let scored = summary.count_total - summary.count_failed;
    writeln!(out, "SENTIMENT ANALYSIS SUMMARY")?;
    writeln!(out, "{rule}")?;
    for label in AdjustedLabel::ALL {
        let count = summary.count_by_sentiment_label.get(&label).copied().unwrap_or(0);
        writeln!(out, "{}: {} ({:.1}%)", label, count, percent(count, scored))?;
    }
    writeln!(out, "Average Confidence Score: {:.3}", summary.mean_confidence)?;
    writeln!(out, "Average Relevance Score: {:.3}", summary.mean_relevance_score)?;
    writeln!(out)?;

    writeln!(out, "COMMENT TYPES")?;
    writeln!(out, "{rule}")?;
    for (category, count) in &summary.count_by_category {
        writeln!(out, "{category}: {count}")?;
    }
    writeln!(out, "Constructive feedback: {}", summary.count_constructive)?;
    writeln!(out)?;

    if let Some(index) = index {
        writeln!(out, "RELEVANCE")?;
        writeln!(out, "{rule}")?;
        for (band, count) in &summary.count_by_relevance_band {
            if *count > 0 {
                writeln!(out, "{}: {count}", band.as_str())?;
            }
        }
        let discussed = most_discussed_sections(outcome, TOP_SECTIONS);
        if !discussed.is_empty() {
            writeln!(out, "Most discussed sections:")?;
            for (id, count) in discussed {
                let label = index.section(id).map_or("unknown", |s| s.label.as_str());
                writeln!(out, "  {label}: {count} comments")?;
            }
        }
        writeln!(out)?;
    }

    let texts: Vec<&str> = comments.iter().map(|c| c.raw_text.as_str()).collect();
    let top = keywords::top_keywords(&texts, TOP_KEYWORDS);
    if !top.is_empty() {
        writeln!(out, "TOP KEYWORDS")?;
        writeln!(out, "{rule}")?;
        for (word, count) in top {
            writeln!(out, "{word}: {count}")?;
        }
    }
    Ok(())
}

/// Sections most often picked as best match by relevant comments.
pub fn most_discussed_sections(outcome: &BatchOutcome, limit: usize) -> Vec<(usize, usize)> {
    let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
    for record in outcome.records.iter().filter(|r| r.is_ok()) {
        if record.relevance.score <= RELEVANT_SCORE {
            continue;
        }
        if let Some(id) = record.relevance.best_section_id {
            *counts.entry(id).or_insert(0) += 1;
        }
    }
    let mut ranked: Vec<(usize, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(limit);
    ranked
}

fn percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}
