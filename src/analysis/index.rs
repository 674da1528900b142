//! Document indexing: section splitting and per-section TF-IDF vectors.

use std::collections::{BTreeMap, HashMap};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, info};

use crate::{error::AnalysisError, nlp::tokens};

/// Sparse term → weight vector. Terms iterate in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TermVector {
    weights: BTreeMap<String, f64>,
}

impl TermVector {
    pub fn from_weights(weights: BTreeMap<String, f64>) -> Self {
        Self { weights }
    }

    pub fn get(&self, term: &str) -> f64 {
        self.weights.get(term).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(term, weight)| (term.as_str(), *weight))
    }

    pub fn norm(&self) -> f64 {
        self.weights.values().map(|w| w * w).sum::<f64>().sqrt()
    }

    pub fn dot(&self, other: &TermVector) -> f64 {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small.iter().map(|(term, w)| w * large.get(term)).sum()
    }

    /// Multiply every weight by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            weights: self
                .weights
                .iter()
                .map(|(term, w)| (term.clone(), w * factor))
                .collect(),
        }
    }

    /// Highest-weighted terms, ties broken alphabetically.
    pub fn top_terms(&self, n: usize) -> Vec<(&str, f64)> {
        let mut terms: Vec<(&str, f64)> = self.iter().collect();
        terms.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        terms.truncate(n);
        terms
    }
}

/// Labeled span of the source document.
#[derive(Debug, Clone, Serialize)]
pub struct Section {
    /// Position in document order, 0-based.
    pub id: usize,
    pub label: String,
    pub raw_text: String,
    pub term_vector: TermVector,
}

/// How the document was split, recorded for logs and the `index` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SplitStrategy {
    Headings,
    NumberedClauses,
    Paragraphs,
    WholeDocument,
}

/// Immutable index over one document's sections.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentIndex {
    pub title: String,
    pub strategy: SplitStrategy,
    sections: Vec<Section>,
    idf: BTreeMap<String, f64>,
}

impl DocumentIndex {
    /// Split and weight a document. Fails with `EmptyDocument` on blank input.
    pub fn build(title: impl Into<String>, text: &str) -> Result<Self, AnalysisError> {
        let title = title.into();
        let normalized = text.trim();
        if normalized.is_empty() {
            return Err(AnalysisError::EmptyDocument);
        }

        let (strategy, spans) = split_sections(normalized);
        if spans.is_empty() {
            return Err(AnalysisError::EmptyDocument);
        }

        let counts: Vec<BTreeMap<String, usize>> = spans
            .iter()
            .map(|span| tokens::term_counts(&span.body))
            .collect();
        let idf = inverse_document_frequency(&counts);

        let sections: Vec<Section> = spans
            .into_iter()
            .zip(&counts)
            .enumerate()
            .map(|(id, (span, counts))| Section {
                id,
                label: span.label,
                raw_text: span.body,
                term_vector: weigh(counts, &idf),
            })
            .collect();

        info!(
            %title,
            ?strategy,
            sections = sections.len(),
            vocabulary = idf.len(),
            "indexed document"
        );
        Ok(Self {
            title,
            strategy,
            sections,
            idf,
        })
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn section(&self, id: usize) -> Option<&Section> {
        self.sections.get(id)
    }

    /// Weight arbitrary text with this document's IDF, dropping unseen terms.
    pub fn vectorize(&self, text: &str) -> TermVector {
        let counts: BTreeMap<String, usize> = tokens::term_counts(text)
            .into_iter()
            .filter(|(term, _)| self.idf.contains_key(term))
            .collect();
        weigh(&counts, &self.idf)
    }
}

/// Smoothed IDF over the document's own sections: `ln((1 + N) / (1 + df)) + 1`.
fn inverse_document_frequency(counts: &[BTreeMap<String, usize>]) -> BTreeMap<String, f64> {
    let n = counts.len() as f64;
    let mut df: HashMap<&str, usize> = HashMap::new();
    for section in counts {
        for term in section.keys() {
            *df.entry(term.as_str()).or_insert(0) += 1;
        }
    }
    df.into_iter()
        .map(|(term, df)| (term.to_string(), ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0))
        .collect()
}

/// Sublinear TF times IDF.
fn weigh(counts: &BTreeMap<String, usize>, idf: &BTreeMap<String, f64>) -> TermVector {
    let weights = counts
        .iter()
        .filter_map(|(term, &count)| {
            let idf = idf.get(term)?;
            let tf = 1.0 + (count as f64).ln();
            Some((term.clone(), tf * idf))
        })
        .collect();
    TermVector::from_weights(weights)
}

#[derive(Debug, Clone, PartialEq)]
struct SectionSpan {
    label: String,
    body: String,
}

static HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(section|clause|article|chapter|part)\s+(\d+(?:\.\d+)*)\s*[:.)]?")
        .expect("valid regex")
});

static NUMBERED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*(\d+(?:\.\d+)*)[.:)][ \t]+").expect("valid regex"));

static BLANK_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n[ \t]*\n").expect("valid regex"));

/// Split on the first strategy that yields sections: explicit headings, numbered
/// clauses, blank-line paragraphs, then the whole text.
fn split_sections(text: &str) -> (SplitStrategy, Vec<SectionSpan>) {
    let headings = split_on_markers(text, &HEADING, |caps| {
        let kind = caps[1].to_lowercase();
        let mut chars = kind.chars();
        let label: String = chars
            .next()
            .map(|first| first.to_uppercase().chain(chars).collect())
            .unwrap_or_default();
        format!("{label} {}", &caps[2])
    });
    if !headings.is_empty() {
        return (SplitStrategy::Headings, headings);
    }

    let numbered = split_on_markers(text, &NUMBERED, |caps| format!("Clause {}", &caps[1]));
    if !numbered.is_empty() {
        return (SplitStrategy::NumberedClauses, numbered);
    }

    let paragraphs: Vec<SectionSpan> = BLANK_LINE
        .split(text)
        .map(collapse_whitespace)
        .filter(|p| !p.is_empty())
        .enumerate()
        .map(|(idx, body)| SectionSpan {
            label: format!("Paragraph {}", idx + 1),
            body,
        })
        .collect();
    if paragraphs.len() > 1 {
        return (SplitStrategy::Paragraphs, paragraphs);
    }

    debug!("no structure detected; indexing whole document as one section");
    (
        SplitStrategy::WholeDocument,
        vec![SectionSpan {
            label: "Document".to_string(),
            body: collapse_whitespace(text),
        }],
    )
}

/// Slice text between consecutive marker matches. Leading text becomes a preamble.
fn split_on_markers<F>(text: &str, marker: &Regex, label: F) -> Vec<SectionSpan>
where
    F: Fn(&regex::Captures<'_>) -> String,
{
    let matches: Vec<regex::Captures<'_>> = marker.captures_iter(text).collect();
    if matches.is_empty() {
        return Vec::new();
    }

    let mut spans = Vec::new();
    let first_start = matches[0].get(0).map_or(0, |m| m.start());
    let preamble = collapse_whitespace(&text[..first_start]);
    if !preamble.is_empty() {
        spans.push(SectionSpan {
            label: "Preamble".to_string(),
            body: preamble,
        });
    }

    for (idx, caps) in matches.iter().enumerate() {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let end = matches
            .get(idx + 1)
            .and_then(|next| next.get(0))
            .map_or(text.len(), |m| m.start());
        let body = collapse_whitespace(&text[whole.end()..end]);
        if body.is_empty() {
            continue;
        }
        spans.push(SectionSpan {
            label: label(caps),
            body,
        });
    }
    spans
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headings_split_in_document_order() {
        let index = DocumentIndex::build(
            "Fees bill",
            "Section 1. Fees shall be reduced. Section 2. Reporting deadlines extended.",
        )
        .unwrap();
        assert_eq!(index.strategy, SplitStrategy::Headings);
        let labels: Vec<&str> = index.sections().iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Section 1", "Section 2"]);
        assert_eq!(index.sections()[0].raw_text, "Fees shall be reduced.");
        assert_eq!(index.sections()[1].id, 1);
    }

    #[test]
    fn preamble_is_kept() {
        let index =
            DocumentIndex::build("Bill", "An Act to amend fees.\nClause 1: Fees drop.").unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.sections()[0].label, "Preamble");
        assert_eq!(index.sections()[1].label, "Clause 1");
    }

    #[test]
    fn numbered_clauses_are_detected() {
        let text = "1. Boards must publish accounts.\n2. Directors may be removed.\n2.1 Notice applies.";
        let index = DocumentIndex::build("Bill", text).unwrap();
        assert_eq!(index.strategy, SplitStrategy::NumberedClauses);
        assert_eq!(index.len(), 2);
        assert_eq!(index.sections()[1].label, "Clause 2");
    }

    #[test]
    fn paragraphs_are_the_fallback() {
        let index = DocumentIndex::build("Memo", "Boards publish.\n\nDirectors retire.").unwrap();
        assert_eq!(index.strategy, SplitStrategy::Paragraphs);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn unstructured_text_is_one_section() {
        let index = DocumentIndex::build("Memo", "Just a single  line of text").unwrap();
        assert_eq!(index.strategy, SplitStrategy::WholeDocument);
        assert_eq!(index.len(), 1);
        assert_eq!(index.sections()[0].raw_text, "Just a single line of text");
        assert!(!index.sections()[0].term_vector.is_empty());
    }

    #[test]
    fn blank_document_is_rejected() {
        assert_eq!(
            DocumentIndex::build("Empty", " \n\t ").unwrap_err(),
            AnalysisError::EmptyDocument
        );
    }

    #[test]
    fn shared_terms_weigh_less_than_distinctive_ones() {
        let index = DocumentIndex::build(
            "Bill",
            "Section 1. Fees for filing. Section 2. Fees for audits.",
        )
        .unwrap();
        let first = &index.sections()[0].term_vector;
        assert!(first.get("fee") < first.get("fil"));
    }

    #[test]
    fn vectorize_ignores_unknown_terms() {
        let index = DocumentIndex::build("Bill", "Section 1. Fees shall be reduced.").unwrap();
        let vector = index.vectorize("fees and weather");
        assert!(vector.get("fee") > 0.0);
        assert_eq!(vector.get("weather"), 0.0);
        assert_eq!(vector.len(), 1);
    }
}
