// Copyright © 2025 lituus-io <spicyzhug@gmail.com>
// All Rights Reserved.
// Licensed under PolyForm Noncommercial 1.0.0

//! Flat-file artifacts written as the loop progresses.
//!
//! Every round leaves the prompt it ran, the full judgement list, and a
//! short human-readable summary; the final pass leaves the best prompt,
//! a round/score table, and a final summary. Nothing is read back in by
//! later runs.

use crate::corpus::CorpusItem;
use crate::error::Result;
use crate::optimize::{OptimizationReport, RoundCandidate};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct JudgementRecord<'a> {
    id: &'a str,
    text: &'a str,
    gold_labels: &'a BTreeSet<String>,
    prediction: &'a [String],
    score: f64,
    explanation: &'a str,
}

/// Writes round and final artifacts under one output directory.
pub struct ArtifactWriter {
    dir: PathBuf,
}

impl ArtifactWriter {
    /// Create a writer, creating the output directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// The output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persist one round: prompt text, judgement records, summary.
    pub fn write_round(&self, candidate: &RoundCandidate, corpus: &[CorpusItem]) -> Result<()> {
        let round = candidate.round;
        let rendered = candidate.prompt.render();

        std::fs::write(
            self.dir.join(format!("prompt_round_{}.txt", round)),
            &rendered,
        )?;

        let records: Vec<JudgementRecord<'_>> = corpus
            .iter()
            .zip(&candidate.judged)
            .map(|(item, judgement)| JudgementRecord {
                id: &item.id,
                text: &item.text,
                gold_labels: &item.gold_labels,
                prediction: &judgement.prediction.labels,
                score: judgement.score,
                explanation: &judgement.explanation,
            })
            .collect();
        std::fs::write(
            self.dir.join(format!("judgements_round_{}.json", round)),
            serde_json::to_string_pretty(&records)?,
        )?;

        let summary = format!(
            "Round: {}\nAverage Score: {:.4}\n\nPrompt:\n{}\n",
            round, candidate.average_score, rendered
        );
        std::fs::write(
            self.dir.join(format!("summary_round_{}.txt", round)),
            summary,
        )?;

        Ok(())
    }

    /// Persist the final artifacts: best prompt, score history, summary.
    pub fn write_final(&self, report: &OptimizationReport) -> Result<()> {
        std::fs::write(
            self.dir.join("best_prompt.txt"),
            report.best_prompt.render(),
        )?;

        let mut writer = csv::Writer::from_path(self.dir.join("score_history.csv"))?;
        writer.write_record(["round", "score"])?;
        for (round, score) in report.history.iter().enumerate() {
            writer.write_record([round.to_string(), format!("{}", score)])?;
        }
        writer.flush()?;

        let mut summary = format!(
            "Best Round: {}\nBest Score: {:.4}\n\nPerformance History:\n",
            report.best_round, report.best_score
        );
        for (round, score) in report.history.iter().enumerate() {
            summary.push_str(&format!("Round {}: {:.4}\n", round, score));
        }
        summary.push_str("\nBest Prompt:\n");
        summary.push_str(&report.best_prompt.render());
        std::fs::write(self.dir.join("final_summary.txt"), summary)?;

        Ok(())
    }
}
