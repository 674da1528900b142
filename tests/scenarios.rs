use std::{collections::HashMap, sync::Arc};

use consult_lens::{
    analysis::{
        AdjustedLabel, BatchOrchestrator, Comment, DocumentIndex, RelevanceBand, RelevanceScorer,
    },
    config::AnalysisConfig,
    error::AnalysisError,
    nlp::{classify, Category, RawSentiment, SentimentLabel},
};
use tokio_util::sync::CancellationToken;

const FEES_BILL: &str =
    "Section 1. Fees shall be reduced. Section 2. Reporting deadlines extended.";

#[test]
fn fee_comment_matches_first_section_as_opposition() {
    let index = DocumentIndex::build("Fees bill", FEES_BILL).unwrap();
    assert_eq!(index.len(), 2);

    let comment = "I strongly oppose the fee reduction";
    let classification = classify(comment);
    assert_eq!(classification.category, Category::Opposition);
    assert!(classification
        .rule_matches
        .iter()
        .any(|m| m.starts_with("opposition:oppos")));

    let relevance = RelevanceScorer::new(&index, 1.5).score_text(comment);
    assert_eq!(relevance.best_section_id, Some(0));
    assert!(relevance.score > 0.0);
}

#[tokio::test]
async fn empty_comment_is_a_valid_neutral_record() {
    let index = Arc::new(DocumentIndex::build("Fees bill", FEES_BILL).unwrap());
    let mut sentiments = HashMap::new();
    sentiments.insert(
        "e".to_string(),
        RawSentiment::new(SentimentLabel::Neutral, 0.5),
    );
    let orchestrator =
        BatchOrchestrator::with_precomputed(sentiments, AnalysisConfig::default()).unwrap();
    let outcome = orchestrator
        .run(&[Comment::new("e", "")], Some(index), &CancellationToken::new())
        .await;

    let record = &outcome.records[0];
    assert!(record.is_ok());
    assert_eq!(record.classification.category, Category::Other);
    assert!(record.classification.rule_matches.is_empty());
    assert!(record.relevance.per_section_scores.values().all(|s| *s == 0.0));
    assert_eq!(record.adjusted.unwrap().label, AdjustedLabel::Neutral);
}

#[tokio::test]
async fn neutral_opposition_is_flagged_negative_leaning() {
    let mut sentiments = HashMap::new();
    sentiments.insert(
        "1".to_string(),
        RawSentiment::new(SentimentLabel::Neutral, 0.8),
    );
    let orchestrator =
        BatchOrchestrator::with_precomputed(sentiments, AnalysisConfig::default()).unwrap();
    let outcome = orchestrator
        .run(
            &[Comment::new("1", "We object to the new levy.")],
            None,
            &CancellationToken::new(),
        )
        .await;
    let adjusted = outcome.records[0].adjusted.unwrap();
    assert_eq!(adjusted.label, AdjustedLabel::NegativeLeaningNeutral);
    assert!(adjusted.flagged);
}

#[tokio::test]
async fn empty_document_degrades_to_no_document_mode() {
    let err = DocumentIndex::build("Blank", "   ").unwrap_err();
    assert_eq!(err, AnalysisError::EmptyDocument);
    let index = consult_lens::analysis::index_or_degrade("Blank", Some("   "));
    assert!(index.is_none());

    let mut sentiments = HashMap::new();
    sentiments.insert(
        "1".to_string(),
        RawSentiment::new(SentimentLabel::Positive, 0.9),
    );
    let config = AnalysisConfig::default();
    let orchestrator = BatchOrchestrator::with_precomputed(sentiments, config).unwrap();
    let outcome = orchestrator
        .run(
            &[Comment::new("1", "Good reform of section 2")],
            index.map(Arc::new),
            &CancellationToken::new(),
        )
        .await;
    let record = &outcome.records[0];
    assert_eq!(record.relevance.score, 0.0);
    assert_eq!(record.relevance.best_section_id, None);
    assert_eq!(record.relevance.band, RelevanceBand::Unscored);
    let adjusted = record.adjusted.unwrap();
    assert!((adjusted.score - 0.9 * config.low_relevance_threshold).abs() < 1e-12);
}
