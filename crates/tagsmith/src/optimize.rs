// Copyright © 2025 lituus-io <spicyzhug@gmail.com>
// All Rights Reserved.
// Licensed under PolyForm Noncommercial 1.0.0

//! The optimization loop.
//!
//! One round is predict → judge → record → improve. The loop runs a
//! fixed number of rounds, tracks the best-scoring candidate, persists
//! per-round and final artifacts, and never retries gateway calls: the
//! component-level fallbacks absorb individual failures.

use crate::artifacts::ArtifactWriter;
use crate::corpus::CorpusItem;
use crate::error::{Error, Result};
use crate::judge::{Judge, JudgedPrediction};
use crate::metaprompt::Metaprompter;
use crate::predict::Predictor;
use crate::prompt::PromptDoc;
use tracing::info;

/// Configuration for the optimization loop.
#[derive(Debug, Clone, Copy)]
pub struct OptimizerConfig {
    /// Number of rounds to run. The loop always runs exactly this many;
    /// regressions do not stop it.
    pub max_rounds: u32,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self { max_rounds: 5 }
    }
}

impl OptimizerConfig {
    /// Create a config with the given round count.
    pub const fn new(max_rounds: u32) -> Self {
        Self { max_rounds }
    }
}

/// One completed round: the prompt that ran, its judgements, and the
/// round's average score.
#[derive(Debug, Clone)]
pub struct RoundCandidate {
    /// Round index, 0-based
    pub round: u32,

    /// The prompt evaluated this round
    pub prompt: PromptDoc,

    /// Judge verdicts, one per corpus item in corpus order
    pub judged: Vec<JudgedPrediction>,

    /// Unweighted mean of the judge scores
    pub average_score: f64,
}

/// Best-candidate tracking across rounds.
///
/// The best candidate is replaced only on strict improvement, so on a
/// tie the earliest round that achieved the score stays the best. The
/// history holds one average score per completed round.
#[derive(Debug, Default)]
pub struct OptimizationState {
    best: Option<RoundCandidate>,
    history: Vec<f64>,
}

impl OptimizationState {
    /// Create an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Would this score strictly improve on the current best?
    pub fn is_improvement(&self, score: f64) -> bool {
        self.best
            .as_ref()
            .map_or(true, |best| score > best.average_score)
    }

    /// Record a completed round. Returns true when the candidate became
    /// the new best.
    pub fn record(&mut self, candidate: RoundCandidate) -> bool {
        self.history.push(candidate.average_score);
        if self.is_improvement(candidate.average_score) {
            self.best = Some(candidate);
            true
        } else {
            false
        }
    }

    /// The best candidate so far, if any round has completed.
    pub fn best(&self) -> Option<&RoundCandidate> {
        self.best.as_ref()
    }

    /// Average scores of completed rounds, in round order.
    pub fn history(&self) -> &[f64] {
        &self.history
    }
}

/// Final result of an optimization run.
#[derive(Debug, Clone)]
pub struct OptimizationReport {
    /// Round index that produced the best prompt
    pub best_round: u32,

    /// The best-scoring prompt
    pub best_prompt: PromptDoc,

    /// Its average score
    pub best_score: f64,

    /// Per-round average scores
    pub history: Vec<f64>,
}

type RoundCallback = Box<dyn Fn(&RoundCandidate, bool) + Send + Sync>;

/// Orchestrates predictor, judge, and metaprompter across rounds.
pub struct Optimizer {
    predictor: Predictor,
    judge: Judge,
    metaprompter: Metaprompter,
    config: OptimizerConfig,
    on_round: Option<RoundCallback>,
}

impl Optimizer {
    /// Create a new optimizer from its three collaborators.
    pub fn new(
        predictor: Predictor,
        judge: Judge,
        metaprompter: Metaprompter,
        config: OptimizerConfig,
    ) -> Self {
        Self {
            predictor,
            judge,
            metaprompter,
            config,
            on_round: None,
        }
    }

    /// Set a callback invoked after each round with the candidate and
    /// whether it became the new best.
    pub fn on_round(mut self, f: impl Fn(&RoundCandidate, bool) + Send + Sync + 'static) -> Self {
        self.on_round = Some(Box::new(f));
        self
    }

    /// Run the full optimization and persist artifacts.
    ///
    /// Preconditions: a non-empty corpus and at least one round. Round
    /// `r + 1` never starts before round `r`'s metaprompt completes;
    /// within a round, items are processed sequentially in corpus order.
    pub async fn run(
        &self,
        corpus: &[CorpusItem],
        initial_prompt: PromptDoc,
        artifacts: &ArtifactWriter,
    ) -> Result<OptimizationReport> {
        if corpus.is_empty() {
            return Err(Error::validation("corpus is empty"));
        }
        if self.config.max_rounds == 0 {
            return Err(Error::validation("max_rounds must be at least 1"));
        }

        let mut state = OptimizationState::new();
        let mut prompt = initial_prompt;

        for round in 0..self.config.max_rounds {
            info!(round, "starting round");

            let predictions = self.predictor.predict(corpus, &prompt).await;

            let mut judged = Vec::with_capacity(predictions.len());
            for (item, prediction) in corpus.iter().zip(predictions) {
                judged.push(self.judge.judge(item, prediction).await);
            }

            let average_score =
                judged.iter().map(|j| j.score).sum::<f64>() / judged.len() as f64;

            let candidate = RoundCandidate {
                round,
                prompt: prompt.clone(),
                judged,
                average_score,
            };

            artifacts.write_round(&candidate, corpus)?;

            let is_new_best = state.is_improvement(average_score);
            if is_new_best {
                info!(round, average_score, "new best candidate");
            } else {
                info!(round, average_score, "score did not improve");
            }

            if let Some(ref callback) = self.on_round {
                callback(&candidate, is_new_best);
            }

            if round < self.config.max_rounds - 1 {
                let next = self
                    .metaprompter
                    .propose(&prompt, corpus, &candidate.judged)
                    .await;
                state.record(candidate);
                prompt = next;
            } else {
                state.record(candidate);
            }
        }

        let best = state
            .best()
            .cloned()
            .ok_or_else(|| Error::validation("no rounds completed"))?;

        let report = OptimizationReport {
            best_round: best.round,
            best_prompt: best.prompt,
            best_score: best.average_score,
            history: state.history().to_vec(),
        };

        artifacts.write_final(&report)?;

        info!(
            best_round = report.best_round,
            best_score = report.best_score,
            "optimization complete"
        );

        Ok(report)
    }
}
