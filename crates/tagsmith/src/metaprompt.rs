// Copyright © 2025 lituus-io <spicyzhug@gmail.com>
// All Rights Reserved.
// Licensed under PolyForm Noncommercial 1.0.0

//! Metaprompting: rewriting the instruction region from judge feedback.
//!
//! The rewrite model only ever produces new instruction text; the fixed
//! parts of the prompt document are reassembled mechanically, so a model
//! that ignores the "change nothing else" request cannot corrupt them.

use crate::corpus::CorpusItem;
use crate::judge::JudgedPrediction;
use crate::labels::format_labels;
use crate::prompt::{PromptDoc, INSTRUCTIONS_CLOSE, INSTRUCTIONS_OPEN};
use std::sync::Arc;
use tagsmith_client::{LMRequest, Message, ReasoningEffort, LM};
use tracing::warn;

const PROMPT_OPEN: &str = "<prompt>";
const PROMPT_CLOSE: &str = "</prompt>";

/// Proposes revised candidate prompts via an injected gateway.
pub struct Metaprompter {
    lm: Arc<dyn LM>,
}

impl Metaprompter {
    /// Create a new metaprompter backed by the given gateway client.
    pub fn new(lm: Arc<dyn LM>) -> Self {
        Self { lm }
    }

    /// Propose the next round's prompt from this round's judgements.
    ///
    /// `corpus` and `judged` are parallel slices in corpus order. The
    /// returned document shares the current preamble and postamble; only
    /// the instruction region changes. A gateway failure keeps the
    /// current prompt for the next round.
    pub async fn propose(
        &self,
        prompt: &PromptDoc,
        corpus: &[CorpusItem],
        judged: &[JudgedPrediction],
    ) -> PromptDoc {
        let metaprompt = build_metaprompt(prompt, corpus, judged);
        let request = LMRequest::new()
            .add_message(Message::user(metaprompt.as_str()))
            .with_reasoning_effort(ReasoningEffort::High);

        match self.lm.generate(request).await {
            Ok(response) => prompt.with_instructions(extract_instructions(&response.text)),
            Err(err) => {
                warn!(error = %err, "metaprompt gateway call failed, keeping current prompt");
                prompt.clone()
            }
        }
    }
}

fn build_metaprompt(
    prompt: &PromptDoc,
    corpus: &[CorpusItem],
    judged: &[JudgedPrediction],
) -> String {
    let mut eval_examples = String::new();
    for (item, judgement) in corpus.iter().zip(judged) {
        let gold: Vec<&String> = item.gold_labels.iter().collect();
        eval_examples.push_str(&format!(
            "\nId: {}\nAbstract: {}\nGold Labels: {}\nPrediction: {}\nScore: {}\nExplanation: {}\n",
            item.id,
            item.text,
            format_labels(gold),
            format_labels(&judgement.prediction.labels),
            judgement.score,
            judgement.explanation,
        ));
    }

    format!(
        "You are an expert prompt engineer tasked with improving a system prompt for \
         extracting model names from machine learning paper abstracts.\n\n\
         Here is the current prompt to improve:\n\
         {}\n{}\n{}\n\n\
         Here are evaluations of model predictions using the current prompt:\n\
         <eval_examples>\n{}\n</eval_examples>\n\n\
         Based on these evaluations and their scores and explanations, make important \
         observations and improve the instructions found inside of {}{}.\n\
         Do not change anything outside of {}{}.\n\
         Output only the improved instruction text, with no delimiters and no other part \
         of the prompt.",
        PROMPT_OPEN,
        prompt.render(),
        PROMPT_CLOSE,
        eval_examples,
        INSTRUCTIONS_OPEN,
        INSTRUCTIONS_CLOSE,
        INSTRUCTIONS_OPEN,
        INSTRUCTIONS_CLOSE,
    )
}

/// Pull the instruction text out of a rewrite response.
///
/// Models sometimes echo the delimiters or the whole prompt despite the
/// request; in that case only the delimited region is kept.
fn extract_instructions(response: &str) -> String {
    if response.contains(INSTRUCTIONS_OPEN) {
        return PromptDoc::parse(response).instructions;
    }
    response.trim().to_string()
}
