//! Summarization collaborator and the extractive fallback used offline.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::InferenceError;

/// Texts shorter than this many words are returned as-is.
pub const MIN_WORDS_TO_SUMMARIZE: usize = 50;

/// Opaque summarization collaborator.
pub trait Summarizer: Send + Sync {
    fn summarize(&self, text: &str, max_len: usize, min_len: usize)
        -> Result<String, InferenceError>;
}

/// Leading-sentence summary bounded by word counts.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractiveSummarizer;

impl Summarizer for ExtractiveSummarizer {
    fn summarize(
        &self,
        text: &str,
        max_len: usize,
        min_len: usize,
    ) -> Result<String, InferenceError> {
        if min_len > max_len {
            return Err(InferenceError::Rejected(format!(
                "min_len {min_len} exceeds max_len {max_len}"
            )));
        }
        let cleaned = clean_text(text);
        if cleaned.split_whitespace().count() < MIN_WORDS_TO_SUMMARIZE {
            return Ok(cleaned);
        }

        let mut words: Vec<&str> = Vec::new();
        for sentence in split_sentences(&cleaned) {
            let sentence_words: Vec<&str> = sentence.split_whitespace().collect();
            if words.len() >= min_len && words.len() + sentence_words.len() > max_len {
                break;
            }
            words.extend(sentence_words);
            if words.len() >= max_len {
                break;
            }
        }
        words.truncate(max_len);
        Ok(words.join(" "))
    }
}

/// Collapse whitespace and drop symbols other than basic punctuation.
pub fn clean_text(text: &str) -> String {
    static SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));
    static SYMBOLS: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"[^\w\s.,!?;:]").expect("valid regex"));
    let collapsed = SPACES.replace_all(text, " ");
    SYMBOLS.replace_all(&collapsed, "").trim().to_string()
}

/// Split text into coarse sentences on terminal punctuation.
pub fn split_sentences(text: &str) -> Vec<&str> {
    static SENTENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^.!?]+[.!?]*").expect("valid regex"));
    SENTENCE
        .find_iter(text)
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .collect()
}
