// Copyright © 2025 lituus-io <spicyzhug@gmail.com>
// All Rights Reserved.
// Licensed under PolyForm Noncommercial 1.0.0

//! LM request types

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Message in a chat conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message<'a> {
    /// Role (system, user, assistant)
    #[serde(borrow)]
    pub role: Cow<'a, str>,

    /// Content
    #[serde(borrow)]
    pub content: Cow<'a, str>,
}

impl<'a> Message<'a> {
    /// Create a system message
    pub fn system(content: impl Into<Cow<'a, str>>) -> Self {
        Self {
            role: Cow::Borrowed("system"),
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<Cow<'a, str>>) -> Self {
        Self {
            role: Cow::Borrowed("user"),
            content: content.into(),
        }
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<Cow<'a, str>>) -> Self {
        Self {
            role: Cow::Borrowed("assistant"),
            content: content.into(),
        }
    }
}

/// Reasoning effort level for extended-reasoning models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningEffort {
    /// Minimal deliberation, fastest responses
    Low,
    /// Balanced deliberation
    Medium,
    /// Maximal deliberation, slowest responses
    High,
}

/// Schema-constrained output request.
///
/// When a provider supports constrained decoding, the response is forced
/// to conform to `schema`; providers without support ignore it and the
/// caller falls back to text parsing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseFormat {
    /// Schema name reported to the provider
    pub name: String,

    /// JSON Schema the response must conform to
    pub schema: serde_json::Value,
}

impl ResponseFormat {
    /// Create a new response format
    pub fn new(name: impl Into<String>, schema: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }

    /// Schema for a JSON array of strings.
    pub fn string_array(name: impl Into<String>) -> Self {
        Self::new(
            name,
            serde_json::json!({
                "type": "array",
                "items": { "type": "string" }
            }),
        )
    }
}

/// Request to language model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LMRequest<'a> {
    /// Messages in the conversation
    #[serde(borrow)]
    pub messages: Vec<Message<'a>>,

    /// Override temperature
    pub temperature: Option<f32>,

    /// Override max tokens
    pub max_tokens: Option<u32>,

    /// Reasoning effort (extended-reasoning models only)
    pub reasoning_effort: Option<ReasoningEffort>,

    /// Schema-constrained output
    pub response_format: Option<ResponseFormat>,
}

impl<'a> LMRequest<'a> {
    /// Create a new request
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            temperature: None,
            max_tokens: None,
            reasoning_effort: None,
            response_format: None,
        }
    }

    /// Add a message
    pub fn add_message(mut self, message: Message<'a>) -> Self {
        self.messages.push(message);
        self
    }

    /// Set temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set max tokens
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set reasoning effort
    pub fn with_reasoning_effort(mut self, effort: ReasoningEffort) -> Self {
        self.reasoning_effort = Some(effort);
        self
    }

    /// Set the response format
    pub fn with_response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = Some(format);
        self
    }

    /// Content of the last user message, if any.
    pub fn last_user_content(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == "user")
            .map(|m| m.content.as_ref())
    }
}

impl<'a> Default for LMRequest<'a> {
    fn default() -> Self {
        Self::new()
    }
}
