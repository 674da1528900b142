//! Natural language processing building blocks.

pub mod classifier;
pub mod keywords;
pub mod sentiment;
pub mod summarize;
pub mod tokens;

pub use classifier::{classify, Category, ClassificationResult, RuleTable};
pub use sentiment::{
    HttpSentiment, LexiconSentiment, PrecomputedSentiment, RawSentiment, SentimentLabel,
    SentimentModel,
};
pub use summarize::{ExtractiveSummarizer, Summarizer};
