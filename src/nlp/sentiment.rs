//! Sentiment inference collaborators.
//!
//! The analysis core never runs a model itself; it receives an
//! `Arc<dyn SentimentModel>` at construction time.

use std::{collections::HashMap, fmt, time::Duration};

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::InferenceError;

/// Raw sentiment label as produced by an inference backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "POSITIVE",
            Self::Negative => "NEGATIVE",
            Self::Neutral => "NEUTRAL",
        }
    }

    /// Map backend-specific labels onto the three canonical ones.
    ///
    /// Three-way RoBERTa checkpoints emit `LABEL_0..2` (negative, neutral, positive).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "POSITIVE" | "POS" | "LABEL_2" => Some(Self::Positive),
            "NEGATIVE" | "NEG" | "LABEL_0" => Some(Self::Negative),
            "NEUTRAL" | "NEU" | "LABEL_1" => Some(Self::Neutral),
            _ => None,
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label plus model confidence in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawSentiment {
    pub label: SentimentLabel,
    pub confidence: f64,
}

impl RawSentiment {
    pub fn new(label: SentimentLabel, confidence: f64) -> Self {
        Self {
            label,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}

/// Opaque sentiment-inference collaborator.
#[async_trait]
pub trait SentimentModel: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Infer sentiment for a comment. `comment_id` lets lookup-backed models find
    /// results computed elsewhere.
    async fn infer(&self, comment_id: &str, text: &str) -> Result<RawSentiment, InferenceError>;
}

/// Results computed ahead of time, keyed by comment id.
#[derive(Debug, Clone, Default)]
pub struct PrecomputedSentiment {
    results: HashMap<String, RawSentiment>,
}

impl PrecomputedSentiment {
    pub fn new(results: HashMap<String, RawSentiment>) -> Self {
        Self { results }
    }

    pub fn insert(&mut self, comment_id: impl Into<String>, sentiment: RawSentiment) {
        self.results.insert(comment_id.into(), sentiment);
    }
}

#[async_trait]
impl SentimentModel for PrecomputedSentiment {
    fn name(&self) -> &str {
        "precomputed"
    }

    async fn infer(&self, comment_id: &str, _text: &str) -> Result<RawSentiment, InferenceError> {
        self.results
            .get(comment_id)
            .copied()
            .ok_or_else(|| InferenceError::Missing(comment_id.to_string()))
    }
}

const POSITIVE_TERMS: &[&str] = &[
    "support", "agree", "approve", "good", "excellent", "beneficial", "positive", "welcome",
    "appreciate", "great", "helpful", "useful", "fair", "clear", "improve", "benefit",
];

const NEGATIVE_TERMS: &[&str] = &[
    "oppose", "disagree", "against", "bad", "harmful", "unfair", "burden", "costly", "negative",
    "reject", "concern", "problem", "flawed", "confusing", "excessive", "unacceptable",
];

/// Dictionary fallback used when no model endpoint is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconSentiment;

impl LexiconSentiment {
    /// Polarity in `[-1, 1]`: (positive - negative) / matched.
    pub fn polarity(text: &str) -> f64 {
        static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z]+").expect("valid regex"));
        let lower = text.to_lowercase();
        let (mut pos, mut neg) = (0usize, 0usize);
        for token in WORD.find_iter(&lower).map(|m| m.as_str()) {
            if POSITIVE_TERMS.iter().any(|t| token.starts_with(t)) {
                pos += 1;
            } else if NEGATIVE_TERMS.iter().any(|t| token.starts_with(t)) {
                neg += 1;
            }
        }
        let total = pos + neg;
        if total == 0 {
            0.0
        } else {
            (pos as f64 - neg as f64) / total as f64
        }
    }
}

#[async_trait]
impl SentimentModel for LexiconSentiment {
    fn name(&self) -> &str {
        "lexicon"
    }

    async fn infer(&self, _comment_id: &str, text: &str) -> Result<RawSentiment, InferenceError> {
        let polarity = Self::polarity(text);
        let label = if polarity > 0.0 {
            SentimentLabel::Positive
        } else if polarity < 0.0 {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        };
        Ok(RawSentiment::new(label, 0.5 + 0.5 * polarity.abs()))
    }
}

#[derive(Debug, Serialize)]
struct InferRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct InferResponse {
    label: String,
    #[serde(alias = "score")]
    confidence: f64,
}

impl InferResponse {
    fn into_raw(self) -> Result<RawSentiment, InferenceError> {
        let label = SentimentLabel::parse(&self.label).ok_or_else(|| {
            InferenceError::Unavailable(format!("unrecognised label {}", self.label))
        })?;
        if !self.confidence.is_finite() {
            return Err(InferenceError::Rejected(format!(
                "non-finite confidence {}",
                self.confidence
            )));
        }
        Ok(RawSentiment::new(label, self.confidence))
    }
}

/// JSON client for a remote sentiment service: `POST {text}` → `{label, confidence}`.
#[derive(Debug, Clone)]
pub struct HttpSentiment {
    client: Client,
    endpoint: String,
}

impl HttpSentiment {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, InferenceError> {
        let client = Client::builder()
            .user_agent("consult-lens/0.1")
            .timeout(timeout)
            .build()
            .map_err(|err| InferenceError::Unavailable(err.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl SentimentModel for HttpSentiment {
    fn name(&self) -> &str {
        "http"
    }

    async fn infer(&self, comment_id: &str, text: &str) -> Result<RawSentiment, InferenceError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&InferRequest { text })
            .send()
            .await
            .map_err(|err| InferenceError::Unavailable(err.to_string()))?;
        let status = response.status();
        if status.is_client_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(InferenceError::Rejected(format!("{status}: {body}")));
        }
        if !status.is_success() {
            return Err(InferenceError::Unavailable(status.to_string()));
        }
        let body: InferResponse = response
            .json()
            .await
            .map_err(|err| InferenceError::Unavailable(err.to_string()))?;
        let raw = body.into_raw()?;
        debug!(%comment_id, label = %raw.label, confidence = raw.confidence, "remote sentiment");
        Ok(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roberta_labels_are_normalised() {
        assert_eq!(SentimentLabel::parse("LABEL_0"), Some(SentimentLabel::Negative));
        assert_eq!(SentimentLabel::parse("label_1"), Some(SentimentLabel::Neutral));
        assert_eq!(SentimentLabel::parse("POSITIVE"), Some(SentimentLabel::Positive));
        assert_eq!(SentimentLabel::parse("mixed"), None);
    }

    #[test]
    fn remote_response_maps_label_and_score_alias() {
        let body: InferResponse =
            serde_json::from_str(r#"{"label": "LABEL_2", "score": 0.87}"#).unwrap();
        assert_eq!(
            body.into_raw().unwrap(),
            RawSentiment::new(SentimentLabel::Positive, 0.87)
        );

        let body: InferResponse =
            serde_json::from_str(r#"{"label": "negative", "confidence": 1.4}"#).unwrap();
        let raw = body.into_raw().unwrap();
        assert_eq!(raw.label, SentimentLabel::Negative);
        assert_eq!(raw.confidence, 1.0);
    }

    #[test]
    fn remote_response_rejects_bad_values() {
        let unknown = InferResponse {
            label: "mixed".into(),
            confidence: 0.5,
        };
        assert!(matches!(
            unknown.into_raw(),
            Err(InferenceError::Unavailable(_))
        ));
        let nan = InferResponse {
            label: "POSITIVE".into(),
            confidence: f64::NAN,
        };
        assert!(matches!(nan.into_raw(), Err(InferenceError::Rejected(_))));
    }

    #[tokio::test]
    async fn lexicon_reads_polarity() {
        let model = LexiconSentiment;
        let pos = model.infer("1", "We welcome and support this").await.unwrap();
        assert_eq!(pos.label, SentimentLabel::Positive);
        assert!((pos.confidence - 1.0).abs() < 1e-9);
        let neutral = model.infer("2", "").await.unwrap();
        assert_eq!(neutral.label, SentimentLabel::Neutral);
        assert!((neutral.confidence - 0.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn precomputed_reports_missing_ids() {
        let mut model = PrecomputedSentiment::default();
        model.insert("a", RawSentiment::new(SentimentLabel::Negative, 0.9));
        assert!(model.infer("a", "").await.is_ok());
        assert_eq!(
            model.infer("b", "").await.unwrap_err(),
            InferenceError::Missing("b".into())
        );
    }
}
