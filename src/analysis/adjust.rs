//! Context-aware sentiment adjustment.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::relevance::RelevanceResult;
use crate::nlp::{
    classifier::{Category, ClassificationResult},
    sentiment::{RawSentiment, SentimentLabel},
};

/// Sentiment label after relevance and category signals are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AdjustedLabel {
    Positive,
    Negative,
    Neutral,
    /// Neutral wording in a comment classified as opposition.
    NegativeLeaningNeutral,
}

impl AdjustedLabel {
    pub const ALL: [AdjustedLabel; 4] = [
        AdjustedLabel::Positive,
        AdjustedLabel::Negative,
        AdjustedLabel::Neutral,
        AdjustedLabel::NegativeLeaningNeutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "POSITIVE",
            Self::Negative => "NEGATIVE",
            Self::Neutral => "NEUTRAL",
            Self::NegativeLeaningNeutral => "NEGATIVE_LEANING_NEUTRAL",
        }
    }
}

impl From<SentimentLabel> for AdjustedLabel {
    fn from(value: SentimentLabel) -> Self {
        match value {
            SentimentLabel::Positive => Self::Positive,
            SentimentLabel::Negative => Self::Negative,
            SentimentLabel::Neutral => Self::Neutral,
        }
    }
}

impl fmt::Display for AdjustedLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdjustedSentiment {
    pub label: AdjustedLabel,
    pub score: f64,
    /// Set when the label differs from the raw model label.
    pub flagged: bool,
}

/// Scale confidence by relevance, floored at the low-relevance threshold, and
/// surface dissent hidden behind neutral wording.
pub fn adjust(
    raw: RawSentiment,
    relevance: &RelevanceResult,
    classification: &ClassificationResult,
    low_relevance_threshold: f64,
) -> AdjustedSentiment {
    let factor = if relevance.score > low_relevance_threshold {
        relevance.score
    } else {
        low_relevance_threshold
    };
    let score = (raw.confidence * factor).clamp(0.0, 1.0);

    let (label, flagged) = match (classification.category, raw.label) {
        (Category::Opposition, SentimentLabel::Neutral) => {
            (AdjustedLabel::NegativeLeaningNeutral, true)
        }
        (_, label) => (label.into(), false),
    };

    AdjustedSentiment {
        label,
        score,
        flagged,
    }
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;

    use super::*;
    use crate::analysis::relevance::RelevanceBand;

    fn relevance(score: f64) -> RelevanceResult {
        let mut per_section_scores = IndexMap::new();
        per_section_scores.insert(0, score);
        RelevanceResult {
            best_section_id: Some(0),
            score,
            per_section_scores,
            band: RelevanceBand::from_score(score),
        }
    }

    fn classified(category: Category) -> ClassificationResult {
        ClassificationResult {
            category,
            rule_matches: Vec::new(),
        }
    }

    #[test]
    fn relevant_comments_scale_by_relevance() {
        let raw = RawSentiment::new(SentimentLabel::Positive, 0.8);
        let out = adjust(raw, &relevance(0.5), &classified(Category::Support), 0.1);
        assert!((out.score - 0.4).abs() < 1e-12);
        assert_eq!(out.label, AdjustedLabel::Positive);
        assert!(!out.flagged);
    }

    #[test]
    fn weak_relevance_is_floored_at_threshold() {
        let raw = RawSentiment::new(SentimentLabel::Negative, 0.9);
        let out = adjust(raw, &relevance(0.02), &classified(Category::Other), 0.1);
        assert!((out.score - 0.09).abs() < 1e-12);
    }

    #[test]
    fn neutral_opposition_is_flagged() {
        let raw = RawSentiment::new(SentimentLabel::Neutral, 0.7);
        let out = adjust(raw, &relevance(0.6), &classified(Category::Opposition), 0.1);
        assert_eq!(out.label, AdjustedLabel::NegativeLeaningNeutral);
        assert!(out.flagged);
    }

    #[test]
    fn neutral_question_keeps_label() {
        let raw = RawSentiment::new(SentimentLabel::Neutral, 0.7);
        let out = adjust(raw, &relevance(0.6), &classified(Category::Question), 0.1);
        assert_eq!(out.label, AdjustedLabel::Neutral);
        assert!(!out.flagged);
    }
}
