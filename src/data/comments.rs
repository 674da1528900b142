//! Comment ingestion from CSV exports of the consultation portal.

use std::{collections::HashMap, fs::File, io::Read, path::Path};

use anyhow::{anyhow, bail, Context, Result};
use csv::{ReaderBuilder, StringRecord};
use tracing::{info, warn};

use crate::{
    analysis::Comment,
    nlp::sentiment::{RawSentiment, SentimentLabel},
};

/// Column names tried before falling back to the first textual column.
pub const PREFERRED_COLUMNS: &[&str] = &["comments", "comment", "text"];

const ID_COLUMNS: &[&str] = &["id", "comment_id"];
const LABEL_COLUMNS: &[&str] = &["label", "sentiment"];
const CONFIDENCE_COLUMNS: &[&str] = &["confidence", "score"];

/// Name and inferred kind of a CSV column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnProfile {
    pub name: String,
    /// At least one non-empty value is not a number.
    pub textual: bool,
}

/// Pick the comment column: `comments`, `comment`, `text` (case-insensitive), then the
/// first textual column.
pub fn detect_comment_column(columns: &[ColumnProfile]) -> Option<String> {
    PREFERRED_COLUMNS
        .iter()
        .find_map(|preferred| {
            columns
                .iter()
                .find(|c| c.name.trim().eq_ignore_ascii_case(preferred))
        })
        .or_else(|| columns.iter().find(|c| c.textual))
        .map(|c| c.name.clone())
}

/// Comments plus any sentiment already present in the file.
#[derive(Debug, Clone, Default)]
pub struct LoadedComments {
    pub column: String,
    pub comments: Vec<Comment>,
    pub sentiments: HashMap<String, RawSentiment>,
    pub skipped_blank: usize,
}

pub fn load_csv(path: &Path, column: Option<&str>) -> Result<LoadedComments> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let loaded = from_reader(file, column).with_context(|| format!("read {}", path.display()))?;
    info!(
        path = %path.display(),
        column = %loaded.column,
        comments = loaded.comments.len(),
        precomputed = loaded.sentiments.len(),
        "loaded comments"
    );
    Ok(loaded)
}

pub fn from_reader<R: Read>(reader: R, column: Option<&str>) -> Result<LoadedComments> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);
    let headers = reader.headers()?.clone();
    let rows: Vec<StringRecord> = reader.records().collect::<Result<_, _>>()?;

    let profiles = profile_columns(&headers, &rows);
    let column = match column {
        Some(name) => name.to_string(),
        None => detect_comment_column(&profiles).ok_or_else(|| anyhow!("no text column found"))?,
    };
    let Some(text_idx) = position(&headers, &[column.as_str()]) else {
        bail!("column {column:?} not present in header");
    };
    let id_idx = position(&headers, ID_COLUMNS);
    let label_idx = position(&headers, LABEL_COLUMNS);
    let confidence_idx = position(&headers, CONFIDENCE_COLUMNS);

    let mut loaded = LoadedComments {
        column,
        ..LoadedComments::default()
    };
    for (row_number, row) in rows.iter().enumerate() {
        let text = row.get(text_idx).unwrap_or_default();
        if text.trim().is_empty() {
            loaded.skipped_blank += 1;
            continue;
        }
        let id = id_idx
            .and_then(|idx| row.get(idx))
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| (row_number + 1).to_string());

        if let (Some(label_idx), Some(confidence_idx)) = (label_idx, confidence_idx) {
            let label = row.get(label_idx).and_then(SentimentLabel::parse);
            let confidence = row
                .get(confidence_idx)
                .and_then(|v| v.trim().parse::<f64>().ok())
                .filter(|c| c.is_finite());
            if let (Some(label), Some(confidence)) = (label, confidence) {
                loaded
                    .sentiments
                    .insert(id.clone(), RawSentiment::new(label, confidence));
            }
        }
        loaded.comments.push(Comment::new(id, text));
    }
    if loaded.skipped_blank > 0 {
        warn!(skipped = loaded.skipped_blank, "skipped rows with blank comment text");
    }
    Ok(loaded)
}

fn profile_columns(headers: &StringRecord, rows: &[StringRecord]) -> Vec<ColumnProfile> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| ColumnProfile {
            name: name.to_string(),
            textual: rows.iter().filter_map(|row| row.get(idx)).any(|value| {
                let value = value.trim();
                !value.is_empty() && value.parse::<f64>().is_err()
            }),
        })
        .collect()
}

fn position(headers: &StringRecord, names: &[&str]) -> Option<usize> {
    names.iter().find_map(|name| {
        headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(name))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(name: &str, textual: bool) -> ColumnProfile {
        ColumnProfile {
            name: name.to_string(),
            textual,
        }
    }

    #[test]
    fn preferred_names_win_in_order() {
        let columns = [
            profile("text", true),
            profile("Comment", true),
            profile("body", true),
        ];
        assert_eq!(detect_comment_column(&columns).as_deref(), Some("Comment"));
    }

    #[test]
    fn falls_back_to_first_textual_column() {
        let columns = [profile("row", false), profile("feedback", true), profile("notes", true)];
        assert_eq!(detect_comment_column(&columns).as_deref(), Some("feedback"));
        assert_eq!(detect_comment_column(&[profile("n", false)]), None);
    }

    #[test]
    fn reads_ids_and_precomputed_sentiment() {
        let csv = "id,comment,label,confidence\n\
                   a1,We oppose the levy,LABEL_0,0.91\n\
                   a2,,NEUTRAL,0.5\n\
                   a3,Fine by us,POSITIVE,oops\n";
        let loaded = from_reader(csv.as_bytes(), None).unwrap();
        assert_eq!(loaded.column, "comment");
        assert_eq!(loaded.comments.len(), 2);
        assert_eq!(loaded.skipped_blank, 1);
        assert_eq!(loaded.comments[0], Comment::new("a1", "We oppose the levy"));
        assert_eq!(
            loaded.sentiments["a1"],
            RawSentiment::new(SentimentLabel::Negative, 0.91)
        );
        assert!(!loaded.sentiments.contains_key("a3"));
    }

    #[test]
    fn non_finite_confidence_is_not_ingested() {
        let csv = "id,comment,label,confidence\n\
                   a,We support this,POSITIVE,NaN\n\
                   b,We oppose this,NEGATIVE,inf\n\
                   c,Looks fine,POSITIVE,0.7\n";
        let loaded = from_reader(csv.as_bytes(), None).unwrap();
        assert_eq!(loaded.comments.len(), 3);
        assert!(!loaded.sentiments.contains_key("a"));
        assert!(!loaded.sentiments.contains_key("b"));
        assert_eq!(
            loaded.sentiments["c"],
            RawSentiment::new(SentimentLabel::Positive, 0.7)
        );
    }

    #[test]
    fn row_numbers_are_default_ids() {
        let csv = "n,feedback\n1,Too costly\n2,Good idea\n";
        let loaded = from_reader(csv.as_bytes(), None).unwrap();
        assert_eq!(loaded.column, "feedback");
        let ids: Vec<&str> = loaded.comments.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn explicit_missing_column_errors() {
        assert!(from_reader("a,b\nx,y\n".as_bytes(), Some("comments")).is_err());
    }
}
