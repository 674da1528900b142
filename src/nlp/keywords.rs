//! Keyword frequency table over a set of comments.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use super::tokens::STOP_WORDS;

/// Most frequent words of three or more letters, ties broken alphabetically.
pub fn top_keywords<S: AsRef<str>>(texts: &[S], top_n: usize) -> Vec<(String, usize)> {
    static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[a-zA-Z]{3,}\b").expect("valid regex"));
    let mut counts: HashMap<String, usize> = HashMap::new();
    for text in texts {
        let lower = text.as_ref().to_lowercase();
        for word in WORD.find_iter(&lower).map(|m| m.as_str()) {
            if STOP_WORDS.contains(&word) {
                continue;
            }
            *counts.entry(word.to_string()).or_insert(0) += 1;
        }
    }
    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(top_n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_by_frequency_then_alphabet() {
        let texts = ["Fees are high", "the fees hurt", "Hurt firms"];
        let top = top_keywords(&texts, 2);
        assert_eq!(top, vec![("fees".to_string(), 2), ("hurt".to_string(), 2)]);
    }
}
