// Copyright © 2025 lituus-io <spicyzhug@gmail.com>
// All Rights Reserved.
// Licensed under PolyForm Noncommercial 1.0.0

//! Structured candidate prompts.
//!
//! A candidate prompt is not an opaque string: it is a fixed preamble, an
//! editable instruction region, and a fixed postamble. Rewrites replace
//! only the instruction region and the document is reassembled
//! mechanically, so the fixed parts survive every round byte for byte.

use serde::{Deserialize, Serialize};

/// Opening delimiter of the editable instruction region.
pub const INSTRUCTIONS_OPEN: &str = "<instructions>";

/// Closing delimiter of the editable instruction region.
pub const INSTRUCTIONS_CLOSE: &str = "</instructions>";

/// A candidate prompt split into fixed and editable parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptDoc {
    /// Fixed text before the instruction region
    pub preamble: String,

    /// Editable instruction region (without delimiters)
    pub instructions: String,

    /// Fixed text after the instruction region
    pub postamble: String,
}

impl PromptDoc {
    /// Create a new prompt document.
    pub fn new(
        preamble: impl Into<String>,
        instructions: impl Into<String>,
        postamble: impl Into<String>,
    ) -> Self {
        Self {
            preamble: preamble.into(),
            instructions: instructions.into(),
            postamble: postamble.into(),
        }
    }

    /// Parse a flat prompt string into its parts.
    ///
    /// The first `<instructions>`/`</instructions>` pair bounds the
    /// editable region. Text without the delimiters becomes a document
    /// with an empty instruction region and everything in the preamble.
    pub fn parse(text: &str) -> Self {
        let Some(open) = text.find(INSTRUCTIONS_OPEN) else {
            return Self::new(text, "", "");
        };

        let after_open = &text[open + INSTRUCTIONS_OPEN.len()..];
        let (inner, postamble) = match after_open.find(INSTRUCTIONS_CLOSE) {
            Some(close) => (
                &after_open[..close],
                &after_open[close + INSTRUCTIONS_CLOSE.len()..],
            ),
            None => (after_open, ""),
        };

        Self::new(&text[..open], inner.trim(), postamble)
    }

    /// Render the document back to the flat prompt string.
    pub fn render(&self) -> String {
        format!(
            "{}{}\n{}\n{}{}",
            self.preamble,
            INSTRUCTIONS_OPEN,
            self.instructions.trim(),
            INSTRUCTIONS_CLOSE,
            self.postamble
        )
    }

    /// Copy of this document with a replaced instruction region.
    pub fn with_instructions(&self, instructions: impl Into<String>) -> Self {
        let text = instructions.into();
        Self {
            preamble: self.preamble.clone(),
            instructions: text.trim().to_string(),
            postamble: self.postamble.clone(),
        }
    }
}

/// The initial candidate prompt for model-name extraction.
pub fn initial_prompt() -> PromptDoc {
    PromptDoc::new(
        "Your task is to extract model names from machine learning paper abstracts. \
         Your response is an array of the model names in the format [\"model_name\"]. \
         If you don't find model names in the abstract or you are not sure, return [\"NA\"].\n",
        "- Extract model names only, avoid things that are not model names like architectures and dataset names",
        "\n",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_parse_round_trip() {
        let doc = PromptDoc::new("Fixed head.\n", "- do the thing", "\nFixed tail.");
        let parsed = PromptDoc::parse(&doc.render());
        assert_eq!(parsed.preamble, "Fixed head.\n");
        assert_eq!(parsed.instructions, "- do the thing");
        assert_eq!(parsed.postamble, "\nFixed tail.");
    }

    #[test]
    fn test_parse_without_delimiters() {
        let doc = PromptDoc::parse("just a plain prompt");
        assert_eq!(doc.preamble, "just a plain prompt");
        assert!(doc.instructions.is_empty());
        assert!(doc.postamble.is_empty());
    }

    #[test]
    fn test_parse_missing_close_takes_rest() {
        let doc = PromptDoc::parse("head <instructions>rules without close");
        assert_eq!(doc.preamble, "head ");
        assert_eq!(doc.instructions, "rules without close");
        assert!(doc.postamble.is_empty());
    }

    #[test]
    fn test_with_instructions_preserves_fixed_parts() {
        let doc = initial_prompt();
        let rewritten = doc.with_instructions("- be stricter about dataset names\n");

        assert_eq!(rewritten.preamble, doc.preamble);
        assert_eq!(rewritten.postamble, doc.postamble);
        assert_eq!(
            rewritten.instructions,
            "- be stricter about dataset names"
        );
    }

    #[test]
    fn test_initial_prompt_renders_with_region() {
        let rendered = initial_prompt().render();
        assert!(rendered.contains(INSTRUCTIONS_OPEN));
        assert!(rendered.contains(INSTRUCTIONS_CLOSE));
        assert!(rendered.contains("model names"));
    }
}
