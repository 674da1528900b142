//! Lexical comment classifier built on an ordered category rule table.

use std::{fmt, sync::Arc};

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AnalysisError;

/// Discrete comment category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Opposition,
    Support,
    Suggestion,
    Question,
    Other,
}

impl Category {
    /// All categories, highest precedence first.
    pub const ALL: [Category; 5] = [
        Category::Opposition,
        Category::Support,
        Category::Suggestion,
        Category::Question,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Opposition => "Opposition",
            Self::Support => "Support",
            Self::Suggestion => "Suggestion",
            Self::Question => "Question",
            Self::Other => "Other",
        }
    }

    /// Suggestions and questions count as constructive feedback.
    pub fn is_constructive(&self) -> bool {
        matches!(self, Self::Suggestion | Self::Question)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a trigger is matched against comment text. All kinds are case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    /// Whole word.
    Word,
    /// Word starting with the given stem.
    Prefix,
    /// Plain substring.
    Literal,
    /// Caller-supplied regular expression.
    Regex,
}

/// Declarative trigger before compilation.
#[derive(Debug, Clone, Copy)]
pub struct PatternSpec {
    pub kind: PatternKind,
    pub source: &'static str,
}

const fn word(source: &'static str) -> PatternSpec {
    PatternSpec {
        kind: PatternKind::Word,
        source,
    }
}

const fn prefix(source: &'static str) -> PatternSpec {
    PatternSpec {
        kind: PatternKind::Prefix,
        source,
    }
}

const fn literal(source: &'static str) -> PatternSpec {
    PatternSpec {
        kind: PatternKind::Literal,
        source,
    }
}

const OPPOSITION: &[PatternSpec] = &[
    prefix("oppos"),
    prefix("disagree"),
    prefix("reject"),
    prefix("criticis"),
    prefix("criticiz"),
    word("against"),
    word("object"),
    word("objects"),
    word("objection"),
    word("objections"),
    word("unacceptable"),
    word("harmful"),
    word("damaging"),
    word("flawed"),
    word("inadequate"),
    word("insufficient"),
    word("problematic"),
    word("troubling"),
    word("worried"),
    word("worrisome"),
    word("concern"),
    word("concerns"),
    word("concerned"),
    word("problem"),
    word("problems"),
    word("negative"),
];

const SUPPORT: &[PatternSpec] = &[
    prefix("support"),
    prefix("endors"),
    prefix("commend"),
    prefix("appreciat"),
    prefix("welcom"),
    word("agree"),
    word("agreed"),
    word("approve"),
    word("approves"),
    word("favor"),
    word("favour"),
    word("good"),
    word("excellent"),
    word("beneficial"),
    word("positive"),
    word("great"),
    word("wonderful"),
    word("fantastic"),
    word("outstanding"),
    word("praise"),
    word("valuable"),
    word("useful"),
    word("helpful"),
];

const SUGGESTION: &[PatternSpec] = &[
    prefix("suggest"),
    prefix("recommend"),
    prefix("propos"),
    prefix("improv"),
    prefix("amend"),
    prefix("revis"),
    prefix("clarif"),
    prefix("modif"),
    prefix("enhanc"),
    prefix("strengthen"),
    prefix("refin"),
    word("should"),
    word("could"),
    word("consider"),
    word("alternative"),
    word("better"),
    word("change"),
    word("adjust"),
    word("update"),
    word("instead"),
];

const QUESTION: &[PatternSpec] = &[
    literal("?"),
    literal("clarification needed"),
    literal("please explain"),
    word("question"),
    word("ask"),
    word("wonder"),
    word("unclear"),
    word("confused"),
    word("confusion"),
    word("explain"),
    word("how"),
    word("what"),
    word("why"),
    word("when"),
    word("where"),
    word("understand"),
];

/// Compiled trigger with a stable identifier used in `rule_matches`.
#[derive(Debug, Clone)]
pub struct Pattern {
    pub id: String,
    regex: Regex,
}

impl Pattern {
    pub fn compile(category: Category, kind: PatternKind, source: &str) -> Result<Self, AnalysisError> {
        let (expr, label) = match kind {
            PatternKind::Word => (format!(r"\b{}\b", regex::escape(source)), source.to_string()),
            PatternKind::Prefix => (format!(r"\b{}\w*", regex::escape(source)), format!("{source}*")),
            PatternKind::Literal => (regex::escape(source), source.to_string()),
            PatternKind::Regex => (source.to_string(), format!("/{source}/")),
        };
        let regex = RegexBuilder::new(&expr)
            .case_insensitive(true)
            .build()
            .map_err(|err| {
                AnalysisError::InvalidConfiguration(format!("pattern {source:?}: {err}"))
            })?;
        Ok(Self {
            id: format!("{}:{label}", category.as_str().to_ascii_lowercase()),
            regex,
        })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// Triggers associated with one category.
#[derive(Debug, Clone)]
pub struct CategoryRule {
    pub category: Category,
    pub patterns: Vec<Pattern>,
}

/// Immutable rule table evaluated in precedence order.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<CategoryRule>,
}

/// Category assignment plus the identifiers of every trigger that fired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub category: Category,
    pub rule_matches: Vec<String>,
}

impl ClassificationResult {
    pub fn other() -> Self {
        Self {
            category: Category::Other,
            rule_matches: Vec::new(),
        }
    }
}

static DEFAULT_RULES: Lazy<Arc<RuleTable>> = Lazy::new(|| {
    let table = RuleTable::from_specs(&[
        (Category::Opposition, OPPOSITION),
        (Category::Support, SUPPORT),
        (Category::Suggestion, SUGGESTION),
        (Category::Question, QUESTION),
    ])
    .expect("built-in rules compile");
    Arc::new(table)
});

impl RuleTable {
    /// Shared built-in rule table.
    pub fn builtin() -> &'static RuleTable {
        &DEFAULT_RULES
    }

    /// Handle to the built-in table; compiled once per process.
    pub fn shared() -> Arc<RuleTable> {
        Arc::clone(&DEFAULT_RULES)
    }

    /// Build a table from declarative specs; rules are re-ordered by category precedence.
    pub fn from_specs(specs: &[(Category, &[PatternSpec])]) -> Result<Self, AnalysisError> {
        let mut rules = Vec::with_capacity(specs.len());
        for (category, patterns) in specs {
            if *category == Category::Other {
                return Err(AnalysisError::InvalidConfiguration(
                    "Other is the fallback category and takes no rules".into(),
                ));
            }
            let compiled = patterns
                .iter()
                .map(|spec| Pattern::compile(*category, spec.kind, spec.source))
                .collect::<Result<Vec<_>, _>>()?;
            rules.push(CategoryRule {
                category: *category,
                patterns: compiled,
            });
        }
        rules.sort_by_key(|rule| rule.category);
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// Assign the highest-precedence matching category, or `Other`.
    pub fn classify(&self, text: &str) -> ClassificationResult {
        if text.trim().is_empty() {
            return ClassificationResult::other();
        }
        let mut category = None;
        let mut rule_matches = Vec::new();
        for rule in &self.rules {
            for pattern in &rule.patterns {
                if pattern.is_match(text) {
                    category.get_or_insert(rule.category);
                    rule_matches.push(pattern.id.clone());
                }
            }
        }
        let category = category.unwrap_or(Category::Other);
        debug!(%category, matches = rule_matches.len(), "classified comment");
        ClassificationResult {
            category,
            rule_matches,
        }
    }
}

/// Classify with the built-in rule table.
pub fn classify(text: &str) -> ClassificationResult {
    RuleTable::builtin().classify(text)
}
