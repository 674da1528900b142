//! Tokenisation shared by the document indexer and the relevance scorer.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

/// Stop words removed before term weighting.
pub const STOP_WORDS: &[&str] = &[
    "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "is", "are",
    "was", "were", "be", "been", "have", "has", "had", "do", "does", "did", "will", "would",
    "could", "should", "may", "might", "must", "can", "this", "that", "these", "those", "a",
    "an", "i", "you", "he", "she", "it", "we", "they", "me", "him", "her", "us", "them", "my",
    "your", "his", "its", "our", "their", "as", "from", "not", "no", "so", "if", "than", "then",
    "there", "which", "who", "also", "all", "any", "such", "into",
];

/// Legal and technical vocabulary that receives a weight boost in comment vectors.
pub const LEGAL_KEYWORDS: &[&str] = &[
    "section",
    "clause",
    "article",
    "amendment",
    "act",
    "law",
    "regulation",
    "provision",
    "requirement",
    "compliance",
    "penalty",
    "fine",
    "director",
    "company",
    "board",
    "shareholder",
    "csr",
    "remuneration",
    "disqualification",
];

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\p{L}\p{N}]+").expect("valid regex"));

/// Split text into normalised terms: lower-cased, stop words removed, suffixes folded.
pub fn terms(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    WORD.find_iter(&lower)
        .map(|m| m.as_str())
        .filter(|token| token.chars().count() > 1 && !STOP_WORDS.contains(token))
        .map(fold_suffix)
        .collect()
}

/// Count normalised terms. A `BTreeMap` keeps iteration order stable.
pub fn term_counts(text: &str) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for term in terms(text) {
        *counts.entry(term).or_insert(0) += 1;
    }
    counts
}

/// Whether a normalised term stems from one of the legal keywords.
pub fn is_legal_keyword(term: &str) -> bool {
    static FOLDED: Lazy<Vec<String>> =
        Lazy::new(|| LEGAL_KEYWORDS.iter().map(|k| fold_suffix(k)).collect());
    FOLDED.iter().any(|k| k == term)
}

/// Light inflection folding so "fees"/"fee" and "reduced"/"reduction" share a term.
pub fn fold_suffix(token: &str) -> String {
    const SUFFIXES: &[(&str, &str)] = &[
        ("ations", ""),
        ("ation", ""),
        ("tions", ""),
        ("tion", ""),
        ("ments", ""),
        ("ment", ""),
        ("ness", ""),
        ("ies", "y"),
        ("ing", ""),
        ("ed", ""),
        ("es", "e"),
        ("ly", ""),
        ("s", ""),
    ];
    if !token.is_ascii() {
        return token.to_string();
    }
    for (suffix, replacement) in SUFFIXES {
        if let Some(stem) = token.strip_suffix(suffix) {
            if stem.len() >= 3 && !(*suffix == "s" && stem.ends_with('s')) {
                return format!("{stem}{replacement}");
            }
        }
    }
    token.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inflections_share_a_term() {
        assert_eq!(fold_suffix("fees"), fold_suffix("fee"));
        assert_eq!(fold_suffix("reduced"), fold_suffix("reduction"));
        assert_eq!(fold_suffix("deadlines"), fold_suffix("deadline"));
    }

    #[test]
    fn stop_words_and_single_letters_are_dropped() {
        assert_eq!(terms("I oppose the fee"), vec!["oppose", "fee"]);
    }

    #[test]
    fn short_stems_are_left_alone() {
        assert_eq!(fold_suffix("bus"), "bus");
        assert_eq!(fold_suffix("class"), "class");
        assert_eq!(fold_suffix("act"), "act");
    }

    #[test]
    fn legal_keywords_match_after_folding() {
        assert!(is_legal_keyword(&fold_suffix("penalties")));
        assert!(is_legal_keyword(&fold_suffix("sections")));
        assert!(!is_legal_keyword("weather"));
    }
}
