// Copyright © 2025 lituus-io <spicyzhug@gmail.com>
// All Rights Reserved.
// Licensed under PolyForm Noncommercial 1.0.0

//! Provider abstraction for different LM backends

use crate::lm::LMConfig;
use crate::request::LMRequest;
use crate::response::{LMResponse, Usage};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Type of LM provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProviderType {
    /// OpenAI (also compatible endpoints)
    OpenAI,
    /// Local model
    Local,
    /// Custom provider
    Custom,
}

/// Provider trait for LM backends
#[async_trait]
pub trait Provider: Send + Sync {
    /// Complete a request
    async fn complete(
        &self,
        request: LMRequest<'_>,
        config: &LMConfig,
    ) -> anyhow::Result<LMResponse>;

    /// Get provider type
    fn provider_type(&self) -> ProviderType;
}

/// OpenAI provider implementation
pub struct OpenAIProvider {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: "https://api.openai.com/v1".to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Create with custom base URL
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Create from environment.
    ///
    /// Reads `OPENAI_API_KEY` (required) and `TAGSMITH_BASE_URL` (optional
    /// endpoint override, for compatible providers).
    pub fn from_env() -> anyhow::Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow::anyhow!("OPENAI_API_KEY is not set"))?;
        let mut provider = Self::new(api_key);
        if let Ok(base_url) = std::env::var("TAGSMITH_BASE_URL") {
            provider = provider.with_base_url(base_url);
        }
        Ok(provider)
    }
}

#[async_trait]
impl Provider for OpenAIProvider {
    async fn complete(
        &self,
        request: LMRequest<'_>,
        config: &LMConfig,
    ) -> anyhow::Result<LMResponse> {
        #[derive(Serialize)]
        struct OpenAIRequest<'a> {
            model: &'a str,
            messages: &'a [crate::request::Message<'a>],
            #[serde(skip_serializing_if = "Option::is_none")]
            temperature: Option<f32>,
            #[serde(skip_serializing_if = "Option::is_none")]
            max_tokens: Option<u32>,
            #[serde(skip_serializing_if = "Option::is_none")]
            reasoning_effort: Option<crate::request::ReasoningEffort>,
            #[serde(skip_serializing_if = "Option::is_none")]
            response_format: Option<serde_json::Value>,
        }

        #[derive(Deserialize)]
        struct OpenAIResponse {
            choices: Vec<Choice>,
            usage: Option<OpenAIUsage>,
            model: String,
        }

        #[derive(Deserialize)]
        struct Choice {
            message: OpenAIMessage,
            finish_reason: Option<String>,
        }

        #[derive(Deserialize)]
        struct OpenAIMessage {
            content: String,
        }

        #[derive(Deserialize)]
        struct OpenAIUsage {
            prompt_tokens: u32,
            completion_tokens: u32,
            prompt_tokens_details: Option<PromptTokensDetails>,
        }

        #[derive(Deserialize)]
        struct PromptTokensDetails {
            cached_tokens: Option<u32>,
        }

        // Reasoning models reject a sampling temperature; send one or the
        // other, never both.
        let temperature = if request.reasoning_effort.is_some() {
            None
        } else {
            Some(request.temperature.unwrap_or(config.temperature))
        };

        let response_format = request.response_format.as_ref().map(|format| {
            serde_json::json!({
                "type": "json_schema",
                "json_schema": {
                    "name": format.name,
                    "schema": format.schema,
                    "strict": true
                }
            })
        });

        let req = OpenAIRequest {
            model: &config.model,
            messages: &request.messages,
            temperature,
            max_tokens: Some(request.max_tokens.unwrap_or(config.max_tokens)),
            reasoning_effort: request.reasoning_effort,
            response_format,
        };

        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&req)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("gateway error ({}) for {}: {}", status, url, body);
        }

        let response = response.json::<OpenAIResponse>().await?;

        let choice = response
            .choices
            .first()
            .ok_or_else(|| anyhow::anyhow!("No choices in response"))?;

        let mut lm_response = LMResponse::new(choice.message.content.clone(), response.model);

        if let Some(usage) = response.usage {
            let mut parsed = Usage::new(usage.prompt_tokens, usage.completion_tokens);
            if let Some(cached) = usage
                .prompt_tokens_details
                .and_then(|details| details.cached_tokens)
            {
                parsed = parsed.with_cached_tokens(cached);
            }
            lm_response = lm_response.with_usage(parsed);
        }

        if let Some(reason) = &choice.finish_reason {
            lm_response = lm_response.with_finish_reason(reason.clone());
        }

        Ok(lm_response)
    }

    fn provider_type(&self) -> ProviderType {
        ProviderType::OpenAI
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_type() {
        let provider = OpenAIProvider::new("test-key".to_string());
        assert_eq!(provider.provider_type(), ProviderType::OpenAI);
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let provider = OpenAIProvider::new("test-key".to_string())
            .with_base_url("https://proxy.example.com/v1/".to_string());
        assert_eq!(provider.base_url, "https://proxy.example.com/v1");
    }
}
