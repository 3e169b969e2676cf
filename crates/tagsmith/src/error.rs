// Copyright © 2025 lituus-io <spicyzhug@gmail.com>
// All Rights Reserved.
// Licensed under PolyForm Noncommercial 1.0.0

//! Error types for tagsmith

use thiserror::Error;

/// Result type alias for tagsmith operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the tagsmith library
#[derive(Error, Debug)]
pub enum Error {
    /// Corpus loading errors (unreadable file, wrong top-level shape)
    #[error("Corpus error: {0}")]
    Corpus(String),

    /// Model gateway errors that escape the component-level fallbacks
    #[error("Gateway error: {0}")]
    Gateway(String),

    /// Parse errors (prompt documents, evaluation blocks)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Validation errors (precondition violations)
    #[error("Validation error: {0}")]
    Validation(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Create a corpus error
    pub fn corpus(msg: impl Into<String>) -> Self {
        Self::Corpus(msg.into())
    }

    /// Create a gateway error
    pub fn gateway(msg: impl Into<String>) -> Self {
        Self::Gateway(msg.into())
    }

    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Get the error category for logging.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Corpus(_) => "corpus",
            Self::Gateway(_) => "gateway",
            Self::Parse(_) => "parse",
            Self::Validation(_) => "validation",
            Self::Io(_) => "io",
            Self::Json(_) => "json",
            Self::Csv(_) => "csv",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_corpus() {
        let err = Error::corpus("missing file");
        assert!(matches!(err, Error::Corpus(_)));
        assert_eq!(err.to_string(), "Corpus error: missing file");
    }

    #[test]
    fn test_error_gateway() {
        let err = Error::gateway("connection refused");
        assert!(matches!(err, Error::Gateway(_)));
        assert_eq!(err.to_string(), "Gateway error: connection refused");
    }

    #[test]
    fn test_error_category() {
        assert_eq!(Error::corpus("x").category(), "corpus");
        assert_eq!(Error::gateway("x").category(), "gateway");
        assert_eq!(Error::parse("x").category(), "parse");
        assert_eq!(Error::validation("x").category(), "validation");
    }
}
