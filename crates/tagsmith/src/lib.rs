// Copyright © 2025 lituus-io <spicyzhug@gmail.com>
// All Rights Reserved.
// Licensed under PolyForm Noncommercial 1.0.0

//! # Tagsmith - LLM-as-Judge Prompt Optimization
//!
//! Iteratively improves a label-extraction prompt against a validation
//! corpus: a predictor runs the candidate prompt over every item, a judge
//! model scores each prediction against the gold labels, and a
//! metaprompter rewrites the prompt's instruction region from the scored
//! transcript. The loop tracks the best-scoring round and persists
//! per-round and final artifacts.
//!
//! ## Architecture
//!
//! - **PromptDoc**: candidate prompts are structured documents with an
//!   editable instruction region; rewrites cannot touch the fixed parts.
//! - **Injected gateway**: every component takes an `Arc<dyn LM>` so
//!   tests swap in mock clients.
//! - **Degrade, don't abort**: malformed model output falls back through
//!   parsing stages to sentinels; one bad response never kills a round.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use tagsmith::{
//!     initial_prompt, load_corpus, ArtifactWriter, Judge, Metaprompter,
//!     Optimizer, OptimizerConfig, Predictor,
//! };
//! use tagsmith_client::{LMClient, LMConfig, OpenAIProvider};
//!
//! let provider = OpenAIProvider::from_env()?;
//! let lm: Arc<dyn tagsmith_client::LM> =
//!     Arc::new(LMClient::new(LMConfig::for_model("gpt-4o-mini"), Box::new(provider)));
//!
//! let corpus = load_corpus("val_data.json")?;
//! let artifacts = ArtifactWriter::new("results")?;
//! let optimizer = Optimizer::new(
//!     Predictor::new(lm.clone()),
//!     Judge::new(lm.clone()),
//!     Metaprompter::new(lm),
//!     OptimizerConfig::default(),
//! );
//! let report = optimizer.run(&corpus, initial_prompt(), &artifacts).await?;
//! ```

#![warn(missing_docs)]

pub mod artifacts;
pub mod corpus;
pub mod error;
pub mod judge;
pub mod labels;
pub mod metaprompt;
pub mod optimize;
pub mod predict;
pub mod prompt;

pub use artifacts::ArtifactWriter;
pub use corpus::{load_corpus, CorpusItem};
pub use error::{Error, Result};
pub use judge::{Judge, JudgedPrediction, PARSE_FAILURE_EXPLANATION};
pub use labels::{format_labels, parse_list_literal, parse_prediction_text, FALLBACK_LABEL};
pub use metaprompt::Metaprompter;
pub use optimize::{
    OptimizationReport, OptimizationState, Optimizer, OptimizerConfig, RoundCandidate,
};
pub use predict::{Prediction, Predictor};
pub use prompt::{initial_prompt, PromptDoc, INSTRUCTIONS_CLOSE, INSTRUCTIONS_OPEN};
