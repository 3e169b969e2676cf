// Copyright © 2025 lituus-io <spicyzhug@gmail.com>
// All Rights Reserved.
// Licensed under PolyForm Noncommercial 1.0.0

//! Language model client abstraction

use crate::provider::Provider;
use crate::request::LMRequest;
use crate::response::LMResponse;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Configuration for LM client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LMConfig {
    /// Model name
    pub model: String,

    /// Temperature
    pub temperature: f32,

    /// Max tokens
    pub max_tokens: u32,
}

impl Default for LMConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.0,
            max_tokens: 4000,
        }
    }
}

impl LMConfig {
    /// Create a config for the given model
    pub fn for_model(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }
}

/// Language model client trait
#[async_trait]
pub trait LM: Send + Sync {
    /// Generate a completion
    async fn generate(&self, request: LMRequest<'_>) -> anyhow::Result<LMResponse>;

    /// Get the model name
    fn model(&self) -> &str;

    /// Get configuration
    fn config(&self) -> &LMConfig;
}

/// Concrete LM implementation
pub struct LMClient {
    config: LMConfig,
    provider: Box<dyn Provider>,
}

impl LMClient {
    /// Create a new LM client
    pub fn new(config: LMConfig, provider: Box<dyn Provider>) -> Self {
        Self { config, provider }
    }

    /// Create with default config
    pub fn with_provider(provider: Box<dyn Provider>) -> Self {
        Self::new(LMConfig::default(), provider)
    }
}

#[async_trait]
impl LM for LMClient {
    async fn generate(&self, request: LMRequest<'_>) -> anyhow::Result<LMResponse> {
        self.provider.complete(request, &self.config).await
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn config(&self) -> &LMConfig {
        &self.config
    }
}

/// A mock LM for testing and examples.
///
/// Uses a closure to generate responses without any network calls. The
/// closure receives the full request so tests can branch on message
/// content.
pub struct MockLM<F>
where
    F: Fn(&LMRequest<'_>) -> String + Send + Sync,
{
    generator: F,
    config: LMConfig,
}

impl<F> MockLM<F>
where
    F: Fn(&LMRequest<'_>) -> String + Send + Sync,
{
    /// Create a new mock LM with the given generator function.
    pub fn new(generator: F) -> Self {
        Self {
            generator,
            config: LMConfig::for_model("mock"),
        }
    }
}

#[async_trait]
impl<F> LM for MockLM<F>
where
    F: Fn(&LMRequest<'_>) -> String + Send + Sync,
{
    async fn generate(&self, request: LMRequest<'_>) -> anyhow::Result<LMResponse> {
        let text = (self.generator)(&request);
        Ok(LMResponse::new(text, self.config.model.clone()))
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn config(&self) -> &LMConfig {
        &self.config
    }
}

/// A mock LM that replays a fixed sequence of responses.
///
/// Each call returns the next scripted response; once the script is
/// exhausted the last response repeats. Useful for testing loops where
/// the output should change across calls.
pub struct SequenceLM {
    responses: Vec<String>,
    index: AtomicUsize,
    config: LMConfig,
}

impl SequenceLM {
    /// Create a new sequence LM from scripted responses.
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            responses,
            index: AtomicUsize::new(0),
            config: LMConfig::for_model("sequence"),
        }
    }

    /// Number of calls made so far.
    pub fn calls(&self) -> usize {
        self.index.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LM for SequenceLM {
    async fn generate(&self, _request: LMRequest<'_>) -> anyhow::Result<LMResponse> {
        let i = self.index.fetch_add(1, Ordering::SeqCst);
        let text = self
            .responses
            .get(i)
            .or_else(|| self.responses.last())
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("SequenceLM has no responses"))?;
        Ok(LMResponse::new(text, self.config.model.clone()))
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn config(&self) -> &LMConfig {
        &self.config
    }
}

/// An LM that fails every call with a fixed error.
///
/// Useful for testing the degraded paths around gateway failures.
#[derive(Debug, Clone)]
pub struct FailingLM {
    message: String,
    config: LMConfig,
}

impl FailingLM {
    /// Create a new failing LM with the given error message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            config: LMConfig::for_model("failing"),
        }
    }
}

#[async_trait]
impl LM for FailingLM {
    async fn generate(&self, _request: LMRequest<'_>) -> anyhow::Result<LMResponse> {
        anyhow::bail!("{}", self.message)
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn config(&self) -> &LMConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Message;

    #[tokio::test]
    async fn test_mock_lm() {
        let lm = MockLM::new(|req: &LMRequest<'_>| {
            format!("echo: {}", req.last_user_content().unwrap_or(""))
        });

        let request = LMRequest::new().add_message(Message::user("hello"));
        let response = lm.generate(request).await.unwrap();
        assert_eq!(response.text, "echo: hello");
        assert_eq!(lm.model(), "mock");
    }

    #[tokio::test]
    async fn test_sequence_lm_replays_and_repeats() {
        let lm = SequenceLM::new(vec!["first".to_string(), "second".to_string()]);

        let req = || LMRequest::new().add_message(Message::user("x"));
        assert_eq!(lm.generate(req()).await.unwrap().text, "first");
        assert_eq!(lm.generate(req()).await.unwrap().text, "second");
        assert_eq!(lm.generate(req()).await.unwrap().text, "second");
        assert_eq!(lm.calls(), 3);
    }

    #[tokio::test]
    async fn test_failing_lm() {
        let lm = FailingLM::new("simulated timeout");

        let request = LMRequest::new().add_message(Message::user("hello"));
        let result = lm.generate(request).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("simulated timeout"));
    }

    #[test]
    fn test_config_for_model() {
        let config = LMConfig::for_model("o3-mini");
        assert_eq!(config.model, "o3-mini");
        assert_eq!(config.temperature, 0.0);
    }
}
