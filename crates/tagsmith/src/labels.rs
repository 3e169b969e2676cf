// Copyright © 2025 lituus-io <spicyzhug@gmail.com>
// All Rights Reserved.
// Licensed under PolyForm Noncommercial 1.0.0

//! Best-effort decoding of label lists from model output.
//!
//! Predictions come back as text that is *usually* a list literal like
//! `["BERT", "GPT-4"]` but models also produce single-quoted items,
//! surrounding prose, or garbage. The chain here degrades in stages and
//! bottoms out at the sentinel list instead of failing.

use regex::Regex;
use std::sync::OnceLock;

/// Sentinel label emitted when parsing fails or nothing was extracted.
pub const FALLBACK_LABEL: &str = "NA";

/// Prefix some models prepend to the label array.
const LABEL_PREFIX: &str = "Tags: ";

/// The single-element sentinel list.
pub fn sentinel_labels() -> Vec<String> {
    vec![FALLBACK_LABEL.to_string()]
}

fn bracket_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\[[^\]]*\]").expect("bracket pattern is valid"))
}

/// Parse a list literal of strings, tolerating Python-style single quotes.
///
/// Returns `None` when the text is not bracketed or the contents cannot
/// be read as a list. `Some(vec![])` is a successfully parsed empty list.
pub fn parse_list_literal(text: &str) -> Option<Vec<String>> {
    let trimmed = text.trim();
    if !trimmed.starts_with('[') || !trimmed.ends_with(']') {
        return None;
    }

    // Well-formed JSON first; single-quoted literals need the scanner below.
    if let Ok(items) = serde_json::from_str::<Vec<String>>(trimmed) {
        return Some(items);
    }

    let inner = &trimmed[1..trimmed.len() - 1];
    if inner.trim().is_empty() {
        return Some(Vec::new());
    }

    let mut items = Vec::new();
    let mut chars = inner.chars();
    let mut saw_quote = false;

    while let Some(c) = chars.next() {
        if c == '\'' || c == '"' {
            saw_quote = true;
            let quote = c;
            let mut item = String::new();
            let mut closed = false;
            while let Some(c) = chars.next() {
                if c == '\\' {
                    if let Some(escaped) = chars.next() {
                        item.push(escaped);
                    }
                } else if c == quote {
                    closed = true;
                    break;
                } else {
                    item.push(c);
                }
            }
            if !closed {
                return None;
            }
            items.push(item);
        }
    }

    if saw_quote {
        return Some(items);
    }

    // Unquoted items: split on commas.
    Some(
        inner
            .split(',')
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect(),
    )
}

/// Decode a raw prediction into a label list, never failing.
///
/// Stages: strip the known label prefix, parse the whole text as a list
/// literal, fall back to the first bracketed substring, fall back to the
/// sentinel. An empty parsed list also degrades to the sentinel so
/// downstream consumers can rely on at least one label.
pub fn parse_prediction_text(raw: &str) -> Vec<String> {
    let cleaned = raw.replace(LABEL_PREFIX, "");

    if let Some(labels) = parse_list_literal(&cleaned) {
        if !labels.is_empty() {
            return labels;
        }
        return sentinel_labels();
    }

    if let Some(found) = bracket_pattern().find(&cleaned) {
        if let Some(labels) = parse_list_literal(found.as_str()) {
            if !labels.is_empty() {
                return labels;
            }
        }
    }

    sentinel_labels()
}

/// Render labels the way they appear in prompts: a JSON array of strings.
pub fn format_labels<S: AsRef<str>>(labels: impl IntoIterator<Item = S>) -> String {
    let items: Vec<String> = labels
        .into_iter()
        .map(|label| label.as_ref().to_string())
        .collect();
    serde_json::to_string(&items).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_list() {
        let labels = parse_list_literal(r#"["BERT", "GPT-4"]"#).unwrap();
        assert_eq!(labels, vec!["BERT", "GPT-4"]);
    }

    #[test]
    fn test_parse_single_quoted_list() {
        let labels = parse_list_literal("['Transformer', 'ResNet']").unwrap();
        assert_eq!(labels, vec!["Transformer", "ResNet"]);
    }

    #[test]
    fn test_parse_mixed_quotes_and_apostrophe() {
        let labels = parse_list_literal(r#"['BERT', "GPT-4"]"#).unwrap();
        assert_eq!(labels, vec!["BERT", "GPT-4"]);
    }

    #[test]
    fn test_parse_empty_list() {
        assert_eq!(parse_list_literal("[]").unwrap(), Vec::<String>::new());
        assert_eq!(parse_list_literal("[  ]").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_parse_rejects_non_list() {
        assert!(parse_list_literal("not a list").is_none());
        assert!(parse_list_literal("[unterminated").is_none());
        assert!(parse_list_literal("['unclosed]").is_none());
    }

    #[test]
    fn test_parse_unquoted_items() {
        let labels = parse_list_literal("[BERT, GPT-4]").unwrap();
        assert_eq!(labels, vec!["BERT", "GPT-4"]);
    }

    #[test]
    fn test_prediction_garbage_yields_sentinel() {
        assert_eq!(parse_prediction_text("not a list"), vec![FALLBACK_LABEL]);
        assert_eq!(parse_prediction_text(""), vec![FALLBACK_LABEL]);
    }

    #[test]
    fn test_prediction_strips_prefix() {
        let labels = parse_prediction_text(r#"Tags: ["BERT"]"#);
        assert_eq!(labels, vec!["BERT"]);
    }

    #[test]
    fn test_prediction_extracts_embedded_list() {
        let labels = parse_prediction_text(r#"The models are ["BERT", "T5"] as requested."#);
        assert_eq!(labels, vec!["BERT", "T5"]);
    }

    #[test]
    fn test_prediction_empty_list_degrades_to_sentinel() {
        assert_eq!(parse_prediction_text("[]"), vec![FALLBACK_LABEL]);
    }

    #[test]
    fn test_format_labels() {
        let rendered = format_labels(["BERT", "GPT-4"]);
        assert_eq!(rendered, r#"["BERT","GPT-4"]"#);
        assert_eq!(format_labels(Vec::<String>::new()), "[]");
    }
}
