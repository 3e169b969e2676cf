// Copyright © 2025 lituus-io <spicyzhug@gmail.com>
// All Rights Reserved.
// Licensed under PolyForm Noncommercial 1.0.0

//! Tagsmith CLI tool
//!
//! Runs the full predict → judge → improve loop against a validation
//! dataset and leaves its artifacts in the output directory. One batch
//! run per invocation; nothing is read back from previous runs.

use clap::Parser;
use console::style;
use std::sync::Arc;
use tagsmith::{
    initial_prompt, load_corpus, ArtifactWriter, Judge, Metaprompter, Optimizer, OptimizerConfig,
    Predictor, PromptDoc,
};
use tagsmith_client::{LMClient, LMConfig, OpenAIProvider, LM};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tagsmith")]
#[command(about = "Iterative LLM-as-judge prompt optimization", long_about = None)]
struct Cli {
    /// Path to the validation dataset (JSON array of labeled examples)
    #[arg(short, long, default_value = "val_data.json")]
    data: String,

    /// Output directory for round and final artifacts
    #[arg(short, long, default_value = "results")]
    out: String,

    /// Number of optimization rounds
    #[arg(short, long, default_value_t = 5)]
    rounds: u32,

    /// Prediction model
    #[arg(long, default_value = "gpt-4o-mini")]
    model: String,

    /// Reasoning model used for judging and metaprompting
    #[arg(long, default_value = "o3-mini")]
    judge_model: String,

    /// Initial prompt file; defaults to the built-in extraction prompt
    #[arg(long)]
    prompt_file: Option<String>,
}

fn build_client(model: &str) -> anyhow::Result<Arc<dyn LM>> {
    let provider = OpenAIProvider::from_env()?;
    Ok(Arc::new(LMClient::new(
        LMConfig::for_model(model),
        Box::new(provider),
    )))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    // Env overrides beat the flag defaults, same precedence as the flags
    // themselves when given explicitly.
    let model = std::env::var("TAGSMITH_MODEL").unwrap_or(cli.model);

    let predict_lm = build_client(&model)?;
    let reasoning_lm = build_client(&cli.judge_model)?;

    let corpus = load_corpus(&cli.data)?;
    println!(
        "Loaded {} validation examples from {}",
        corpus.len(),
        cli.data
    );

    let prompt = match &cli.prompt_file {
        Some(path) => PromptDoc::parse(&std::fs::read_to_string(path)?),
        None => initial_prompt(),
    };

    let artifacts = ArtifactWriter::new(&cli.out)?;

    let optimizer = Optimizer::new(
        Predictor::new(predict_lm),
        Judge::new(reasoning_lm.clone()),
        Metaprompter::new(reasoning_lm),
        OptimizerConfig::new(cli.rounds),
    )
    .on_round(|candidate, is_new_best| {
        let line = format!(
            "Round {}: average score {:.4}",
            candidate.round, candidate.average_score
        );
        if is_new_best {
            println!("{} {}", style(line).green(), style("(new best)").bold());
        } else {
            println!("{}", style(line).dim());
        }
    });

    let report = optimizer.run(&corpus, prompt, &artifacts).await?;

    println!();
    println!("{}", style("Optimization complete").bold());
    println!(
        "Best score {} at round {}",
        style(format!("{:.4}", report.best_score)).green(),
        report.best_round
    );
    for (round, score) in report.history.iter().enumerate() {
        println!("  Round {}: {:.4}", round, score);
    }
    println!(
        "Artifacts written to {} (best prompt in best_prompt.txt)",
        artifacts.dir().display()
    );

    Ok(())
}
