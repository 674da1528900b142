//! Cosine relevance of a comment against every indexed section.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::index::{DocumentIndex, TermVector};
use crate::nlp::tokens;

/// Coarse bucket of a relevance score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RelevanceBand {
    High,
    Moderate,
    Somewhat,
    Low,
    /// No document was indexed.
    Unscored,
}

impl RelevanceBand {
    pub const ALL: [RelevanceBand; 5] = [
        RelevanceBand::High,
        RelevanceBand::Moderate,
        RelevanceBand::Somewhat,
        RelevanceBand::Low,
        RelevanceBand::Unscored,
    ];

    pub fn from_score(score: f64) -> Self {
        if score > 0.7 {
            Self::High
        } else if score > 0.5 {
            Self::Moderate
        } else if score > 0.3 {
            Self::Somewhat
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "Highly Relevant",
            Self::Moderate => "Moderately Relevant",
            Self::Somewhat => "Somewhat Relevant",
            Self::Low => "Low Relevance",
            Self::Unscored => "Unscored",
        }
    }
}

/// Best matching section plus every per-section score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelevanceResult {
    /// Argmax of `per_section_scores`, lowest index on ties. `None` without a document.
    pub best_section_id: Option<usize>,
    pub score: f64,
    /// Section id → score, in section order.
    pub per_section_scores: IndexMap<usize, f64>,
    pub band: RelevanceBand,
}

impl RelevanceResult {
    /// Degenerate result used when no document is indexed.
    pub fn unscored() -> Self {
        Self {
            best_section_id: None,
            score: 0.0,
            per_section_scores: IndexMap::new(),
            band: RelevanceBand::Unscored,
        }
    }
}

/// Scores comments against a fixed document index.
#[derive(Debug, Clone, Copy)]
pub struct RelevanceScorer<'a> {
    index: &'a DocumentIndex,
    keyword_boost: f64,
}

impl<'a> RelevanceScorer<'a> {
    pub fn new(index: &'a DocumentIndex, keyword_boost: f64) -> Self {
        Self {
            index,
            keyword_boost,
        }
    }

    /// Comment vector with legal keywords boosted. Section vectors are never touched.
    pub fn comment_vector(&self, text: &str) -> TermVector {
        let vector = self.index.vectorize(text);
        let boosted = vector
            .iter()
            .map(|(term, weight)| {
                let factor = if tokens::is_legal_keyword(term) {
                    self.keyword_boost
                } else {
                    1.0
                };
                (term.to_string(), weight * factor)
            })
            .collect();
        TermVector::from_weights(boosted)
    }

    pub fn score_text(&self, text: &str) -> RelevanceResult {
        self.score_vector(&self.comment_vector(text))
    }

    /// Score a prepared comment vector against every section.
    pub fn score_vector(&self, comment: &TermVector) -> RelevanceResult {
        let mut per_section_scores = IndexMap::with_capacity(self.index.len());
        let mut best: Option<(usize, f64)> = None;
        for section in self.index.sections() {
            let score = cosine(comment, &section.term_vector);
            per_section_scores.insert(section.id, score);
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((section.id, score));
            }
        }
        match best {
            Some((id, score)) => RelevanceResult {
                best_section_id: Some(id),
                score,
                per_section_scores,
                band: RelevanceBand::from_score(score),
            },
            None => RelevanceResult::unscored(),
        }
    }
}

/// Cosine similarity clamped to `[0, 1]`; zero when either vector has no weight.
pub fn cosine(a: &TermVector, b: &TermVector) -> f64 {
    let norm_a = a.norm();
    let norm_b = b.norm();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (a.dot(b) / (norm_a * norm_b)).clamp(0.0, 1.0)
}
