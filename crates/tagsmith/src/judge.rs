// Copyright © 2025 lituus-io <spicyzhug@gmail.com>
// All Rights Reserved.
// Licensed under PolyForm Noncommercial 1.0.0

//! LLM-as-judge scoring of predictions.
//!
//! Each prediction is scored by a second, reasoning-oriented model call.
//! The judge prompt keeps the abstract, the prediction, and the gold
//! labels inside distinct delimiters so the judge cannot confuse which
//! span is which, and asks for a delimited evaluation block that is
//! parsed leniently. A malformed judge response scores 0.0 instead of
//! failing the round.

use crate::corpus::CorpusItem;
use crate::labels::format_labels;
use crate::predict::Prediction;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tagsmith_client::{LMRequest, Message, ReasoningEffort, LM};
use tracing::warn;

const EVAL_OPEN: &str = "<evaluation>";
const EVAL_CLOSE: &str = "</evaluation>";
const SCORE_MARKER: &str = "Score:";
const EXPLANATION_MARKER: &str = "Explanation:";

/// Explanation recorded when the judge response cannot be parsed.
pub const PARSE_FAILURE_EXPLANATION: &str = "Error parsing evaluation";

/// A prediction together with its judge verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgedPrediction {
    /// The prediction that was judged
    pub prediction: Prediction,

    /// Judge score in [0.0, 1.0]
    pub score: f64,

    /// Judge rationale
    pub explanation: String,
}

/// Scores predictions against gold labels via an injected gateway.
pub struct Judge {
    lm: Arc<dyn LM>,
}

impl Judge {
    /// Create a new judge backed by the given gateway client.
    pub fn new(lm: Arc<dyn LM>) -> Self {
        Self { lm }
    }

    /// Judge one prediction against the item's gold labels.
    ///
    /// Gateway failures and unparseable responses both degrade to a zero
    /// score; the round always gets a verdict for every item.
    pub async fn judge(&self, item: &CorpusItem, prediction: Prediction) -> JudgedPrediction {
        let judge_prompt = build_eval_prompt(item, &prediction);
        let request = LMRequest::new()
            .add_message(Message::user(judge_prompt.as_str()))
            .with_reasoning_effort(ReasoningEffort::Low);

        match self.lm.generate(request).await {
            Ok(response) => match parse_evaluation(&response.text) {
                Some((score, explanation)) => JudgedPrediction {
                    prediction,
                    score,
                    explanation,
                },
                None => {
                    warn!(item = %item.id, raw = %response.text, "could not parse judge response");
                    JudgedPrediction {
                        prediction,
                        score: 0.0,
                        explanation: PARSE_FAILURE_EXPLANATION.to_string(),
                    }
                }
            },
            Err(err) => {
                warn!(item = %item.id, error = %err, "judge gateway call failed");
                JudgedPrediction {
                    prediction,
                    score: 0.0,
                    explanation: format!("Gateway error: {}", err),
                }
            }
        }
    }
}

fn build_eval_prompt(item: &CorpusItem, prediction: &Prediction) -> String {
    let gold: Vec<&String> = item.gold_labels.iter().collect();
    format!(
        "<abstract>\n{}\n</abstract>\n\n\
         <prediction>\n{}\n</prediction>\n\n\
         <gold>\n{}\n</gold>\n\n\
         Your task is to evaluate how well the prediction matches the gold labels for \
         extracting model names from a machine learning paper abstract.\n\n\
         Evaluation criteria:\n\
         1. Precision: Are all predicted model names actually present in the abstract and are they actual model names?\n\
         2. Recall: Did the prediction capture all model names in the abstract?\n\
         3. Accuracy: Did the prediction correctly identify model names vs. non-model names?\n\n\
         First, analyze the abstract to identify which model names are actually mentioned.\n\
         Then compare the prediction to the gold labels.\n\n\
         Give a score between 0.0 (completely wrong) and 1.0 (perfect match), with partial \
         credit for partial matches.\n\
         Explain your scoring with specific details about what was correct and incorrect in the prediction.\n\n\
         Your response should be in the format:\n\
         {}\n\
         Score: [score between 0.0 and 1.0]\n\
         Explanation: [detailed explanation]\n\
         {}",
        item.text,
        format_labels(&prediction.labels),
        format_labels(gold),
        EVAL_OPEN,
        EVAL_CLOSE,
    )
}

/// Parse a judge response into score and explanation.
///
/// Requires the opening evaluation delimiter and a `Score:` line with a
/// numeric value; a missing closing delimiter is tolerated. The score is
/// clamped to [0.0, 1.0]. Returns `None` on any other shape.
fn parse_evaluation(response: &str) -> Option<(f64, String)> {
    let (_, after_open) = response.split_once(EVAL_OPEN)?;
    let block = after_open
        .split(EVAL_CLOSE)
        .next()
        .unwrap_or(after_open)
        .trim();

    let score_line = block.lines().find(|line| line.starts_with(SCORE_MARKER))?;
    let score: f64 = score_line[SCORE_MARKER.len()..].trim().parse().ok()?;
    let score = score.clamp(0.0, 1.0);

    let mut explanation = block
        .lines()
        .filter(|line| *line != score_line)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string();
    if let Some(stripped) = explanation.strip_prefix(EXPLANATION_MARKER) {
        explanation = stripped.trim().to_string();
    }

    Some((score, explanation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use tagsmith_client::{FailingLM, MockLM};

    fn item_with_gold(gold: &[&str]) -> CorpusItem {
        CorpusItem {
            id: "p1".to_string(),
            text: "We present BERT.".to_string(),
            gold_labels: gold.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>(),
        }
    }

    fn prediction(labels: &[&str]) -> Prediction {
        Prediction {
            item_id: "p1".to_string(),
            raw_text: format_labels(labels.iter().copied()),
            labels: labels.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_parse_well_formed_evaluation() {
        let response = "<evaluation>\nScore: 0.75\nExplanation: Missed one model.\n</evaluation>";
        let (score, explanation) = parse_evaluation(response).unwrap();
        assert!((score - 0.75).abs() < f64::EPSILON);
        assert_eq!(explanation, "Missed one model.");
    }

    #[test]
    fn test_parse_tolerates_missing_close() {
        let response = "<evaluation>\nScore: 1.0\nPerfect match.";
        let (score, explanation) = parse_evaluation(response).unwrap();
        assert!((score - 1.0).abs() < f64::EPSILON);
        assert_eq!(explanation, "Perfect match.");
    }

    #[test]
    fn test_parse_clamps_out_of_range_score() {
        let response = "<evaluation>\nScore: 1.7\nExplanation: Over-enthusiastic judge.\n</evaluation>";
        let (score, _) = parse_evaluation(response).unwrap();
        assert!((score - 1.0).abs() < f64::EPSILON);

        let response = "<evaluation>\nScore: -0.5\nExplanation: x\n</evaluation>";
        let (score, _) = parse_evaluation(response).unwrap();
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_parse_rejects_missing_score_line() {
        assert!(parse_evaluation("<evaluation>\nNo score here.\n</evaluation>").is_none());
        assert!(parse_evaluation("Score: 0.5").is_none());
        assert!(parse_evaluation("<evaluation>\nScore: high\n</evaluation>").is_none());
    }

    #[tokio::test]
    async fn test_judge_happy_path() {
        let lm = MockLM::new(|_req: &LMRequest<'_>| {
            "<evaluation>\nScore: 1.0\nExplanation: Exact match.\n</evaluation>".to_string()
        });
        let judge = Judge::new(Arc::new(lm));

        let judged = judge
            .judge(&item_with_gold(&["BERT"]), prediction(&["BERT"]))
            .await;
        assert!((judged.score - 1.0).abs() < f64::EPSILON);
        assert_eq!(judged.explanation, "Exact match.");
    }

    #[tokio::test]
    async fn test_judge_unparseable_response_scores_zero() {
        let lm = MockLM::new(|_req: &LMRequest<'_>| "I refuse to grade this.".to_string());
        let judge = Judge::new(Arc::new(lm));

        let judged = judge
            .judge(&item_with_gold(&["BERT"]), prediction(&["BERT"]))
            .await;
        assert_eq!(judged.score, 0.0);
        assert_eq!(judged.explanation, PARSE_FAILURE_EXPLANATION);
    }

    #[tokio::test]
    async fn test_judge_gateway_failure_scores_zero() {
        let judge = Judge::new(Arc::new(FailingLM::new("503 from upstream")));

        let judged = judge
            .judge(&item_with_gold(&["BERT"]), prediction(&["BERT"]))
            .await;
        assert_eq!(judged.score, 0.0);
        assert!(judged.explanation.contains("503"));
    }

    #[tokio::test]
    async fn test_judge_prompt_embeds_delimited_spans() {
        let lm = MockLM::new(|req: &LMRequest<'_>| {
            let content = req.last_user_content().unwrap();
            assert!(content.contains("<abstract>"));
            assert!(content.contains("<prediction>"));
            assert!(content.contains("<gold>"));
            assert!(content.contains(r#"["GPT-4"]"#));
            assert!(content.contains(r#"["BERT"]"#));
            assert_eq!(req.reasoning_effort, Some(ReasoningEffort::Low));
            "<evaluation>\nScore: 0.0\nExplanation: Wrong model.\n</evaluation>".to_string()
        });
        let judge = Judge::new(Arc::new(lm));

        let judged = judge
            .judge(&item_with_gold(&["BERT"]), prediction(&["GPT-4"]))
            .await;
        assert_eq!(judged.explanation, "Wrong model.");
    }
}
