// Copyright © 2025 lituus-io <spicyzhug@gmail.com>
// All Rights Reserved.
// Licensed under PolyForm Noncommercial 1.0.0

//! Validation corpus loading.
//!
//! The corpus is a JSON array of labeled examples. Gold labels may be a
//! JSON array of strings or a string containing a list literal (datasets
//! exported from pandas often stringify the column); both decode to the
//! same set. A record whose labels cannot be decoded degrades to an empty
//! set, an unreadable file fails the whole load.

use crate::error::{Error, Result};
use crate::labels::parse_list_literal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::warn;

/// One labeled example from the validation set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusItem {
    /// Stable identifier for the record
    pub id: String,

    /// Input text the candidate prompt runs against
    pub text: String,

    /// Ground-truth label set, whitespace-stripped
    pub gold_labels: BTreeSet<String>,
}

#[derive(Deserialize)]
struct RawRecord {
    #[serde(alias = "paper")]
    id: String,

    #[serde(alias = "abstract")]
    text: String,

    gold_labels: serde_json::Value,
}

fn decode_gold_labels(id: &str, value: &serde_json::Value) -> BTreeSet<String> {
    match value {
        serde_json::Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_str())
            .map(|item| item.trim().to_string())
            .collect(),
        serde_json::Value::String(text) => match parse_list_literal(text) {
            Some(items) => items.iter().map(|item| item.trim().to_string()).collect(),
            None => {
                warn!(id, labels = %text, "could not parse gold labels, using empty set");
                BTreeSet::new()
            }
        },
        other => {
            warn!(id, labels = %other, "unexpected gold label type, using empty set");
            BTreeSet::new()
        }
    }
}

/// Load the validation corpus from a JSON file.
///
/// Record order is preserved. A missing or unreadable file, or a file
/// whose top level is not an array of records, is fatal.
pub fn load_corpus(path: impl AsRef<Path>) -> Result<Vec<CorpusItem>> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .map_err(|e| Error::corpus(format!("cannot read {}: {}", path.display(), e)))?;

    let records: Vec<RawRecord> = serde_json::from_str(&raw)
        .map_err(|e| Error::corpus(format!("cannot decode {}: {}", path.display(), e)))?;

    Ok(records
        .into_iter()
        .map(|record| {
            let gold_labels = decode_gold_labels(&record.id, &record.gold_labels);
            CorpusItem {
                id: record.id,
                text: record.text,
                gold_labels,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_corpus(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_array_labels() {
        let file = write_corpus(
            r#"[{"id": "p1", "text": "We present BERT.", "gold_labels": [" BERT ", "BERT"]}]"#,
        );
        let corpus = load_corpus(file.path()).unwrap();
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus[0].id, "p1");
        assert_eq!(
            corpus[0].gold_labels,
            BTreeSet::from(["BERT".to_string()])
        );
    }

    #[test]
    fn test_string_literal_matches_array() {
        let as_string = write_corpus(
            r#"[{"id": "p1", "text": "t", "gold_labels": "['Transformer', 'ResNet']"}]"#,
        );
        let as_array = write_corpus(
            r#"[{"id": "p1", "text": "t", "gold_labels": ["Transformer", "ResNet"]}]"#,
        );

        let from_string = load_corpus(as_string.path()).unwrap();
        let from_array = load_corpus(as_array.path()).unwrap();
        assert_eq!(from_string, from_array);
        assert_eq!(
            from_string[0].gold_labels,
            BTreeSet::from(["Transformer".to_string(), "ResNet".to_string()])
        );
    }

    #[test]
    fn test_malformed_labels_degrade_to_empty() {
        let file =
            write_corpus(r#"[{"id": "p1", "text": "t", "gold_labels": "not a list at all"}]"#);
        let corpus = load_corpus(file.path()).unwrap();
        assert!(corpus[0].gold_labels.is_empty());
    }

    #[test]
    fn test_numeric_labels_degrade_to_empty() {
        let file = write_corpus(r#"[{"id": "p1", "text": "t", "gold_labels": 42}]"#);
        let corpus = load_corpus(file.path()).unwrap();
        assert!(corpus[0].gold_labels.is_empty());
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let err = load_corpus("/nonexistent/val_data.json").unwrap_err();
        assert!(matches!(err, Error::Corpus(_)));
    }

    #[test]
    fn test_wrong_top_level_shape_is_fatal() {
        let file = write_corpus(r#"{"id": "p1"}"#);
        assert!(load_corpus(file.path()).is_err());
    }

    #[test]
    fn test_order_preserved_and_original_field_names() {
        let file = write_corpus(
            r#"[
                {"paper": "a", "abstract": "first", "gold_labels": []},
                {"paper": "b", "abstract": "second", "gold_labels": []}
            ]"#,
        );
        let corpus = load_corpus(file.path()).unwrap();
        assert_eq!(corpus[0].id, "a");
        assert_eq!(corpus[0].text, "first");
        assert_eq!(corpus[1].id, "b");
    }
}
