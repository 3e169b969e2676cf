// Copyright © 2025 lituus-io <spicyzhug@gmail.com>
// All Rights Reserved.
// Licensed under PolyForm Noncommercial 1.0.0

//! Model gateway client for tagsmith.
//!
//! Provides the [`LM`] trait for role-tagged chat completions, an
//! OpenAI-compatible HTTP provider, and mock clients for tests.

pub mod lm;
pub mod provider;
pub mod request;
pub mod response;

pub use lm::{FailingLM, LMClient, LMConfig, MockLM, SequenceLM, LM};
pub use provider::{OpenAIProvider, Provider, ProviderType};
pub use request::{LMRequest, Message, ReasoningEffort, ResponseFormat};
pub use response::{LMResponse, Usage};
