// Copyright © 2025 lituus-io <spicyzhug@gmail.com>
// All Rights Reserved.
// Licensed under PolyForm Noncommercial 1.0.0

//! LM response types

use serde::{Deserialize, Serialize};

/// Response from language model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LMResponse {
    /// Generated text
    pub text: String,

    /// Token usage
    pub usage: Option<Usage>,

    /// Model that generated the response
    pub model: String,

    /// Finish reason
    pub finish_reason: Option<String>,
}

/// Token usage statistics
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Usage {
    /// Prompt tokens
    pub prompt_tokens: u32,

    /// Completion tokens
    pub completion_tokens: u32,

    /// Total tokens
    pub total_tokens: u32,

    /// Prompt tokens served from the provider's prompt cache
    pub cached_tokens: Option<u32>,
}

impl Usage {
    /// Create new usage stats
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
            cached_tokens: None,
        }
    }

    /// Record the cached-token count
    pub fn with_cached_tokens(mut self, cached: u32) -> Self {
        self.cached_tokens = Some(cached);
        self
    }

    /// Fraction of prompt tokens served from cache, if reported.
    pub fn cache_hit_ratio(&self) -> Option<f64> {
        let cached = self.cached_tokens?;
        if self.prompt_tokens == 0 {
            return Some(0.0);
        }
        Some(cached as f64 / self.prompt_tokens as f64)
    }
}

impl LMResponse {
    /// Create a new response
    pub fn new(text: String, model: String) -> Self {
        Self {
            text,
            usage: None,
            model,
            finish_reason: None,
        }
    }

    /// Add usage stats
    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = Some(usage);
        self
    }

    /// Set finish reason
    pub fn with_finish_reason(mut self, reason: String) -> Self {
        self.finish_reason = Some(reason);
        self
    }
}
