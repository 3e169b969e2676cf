// Copyright © 2025 lituus-io <spicyzhug@gmail.com>
// All Rights Reserved.
// Licensed under PolyForm Noncommercial 1.0.0

//! Prediction sweep over the validation corpus.

use crate::corpus::CorpusItem;
use crate::labels::{parse_prediction_text, sentinel_labels};
use crate::prompt::PromptDoc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tagsmith_client::{LMRequest, Message, ResponseFormat, LM};
use tracing::{debug, warn};

/// A single model prediction for one corpus item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    /// Identifier of the corpus item this prediction is for
    pub item_id: String,

    /// Raw model output before any parsing
    pub raw_text: String,

    /// Parsed label list; the sentinel list when parsing failed
    pub labels: Vec<String>,
}

/// Runs a candidate prompt over corpus items via an injected gateway.
///
/// The gateway handle is a constructor dependency so tests can substitute
/// a mock client.
pub struct Predictor {
    lm: Arc<dyn LM>,
}

impl Predictor {
    /// Create a new predictor backed by the given gateway client.
    pub fn new(lm: Arc<dyn LM>) -> Self {
        Self { lm }
    }

    /// Predict labels for a single corpus item.
    ///
    /// A gateway failure yields the sentinel prediction for this item so
    /// the sweep can continue.
    pub async fn predict_item(&self, item: &CorpusItem, rendered_prompt: &str) -> Prediction {
        let request = LMRequest::new()
            .add_message(Message::system(rendered_prompt))
            .add_message(Message::user(item.text.as_str()))
            .with_temperature(0.0)
            .with_response_format(ResponseFormat::string_array("labels"));

        match self.lm.generate(request).await {
            Ok(response) => {
                if let Some(ratio) = response.usage.as_ref().and_then(|u| u.cache_hit_ratio()) {
                    debug!(item = %item.id, cache_hit_ratio = ratio, "prompt cache hit");
                }
                let labels = parse_prediction_text(&response.text);
                debug!(item = %item.id, ?labels, "prediction parsed");
                Prediction {
                    item_id: item.id.clone(),
                    raw_text: response.text,
                    labels,
                }
            }
            Err(err) => {
                warn!(item = %item.id, error = %err, "gateway call failed, using sentinel prediction");
                Prediction {
                    item_id: item.id.clone(),
                    raw_text: String::new(),
                    labels: sentinel_labels(),
                }
            }
        }
    }

    /// Predict labels for every corpus item, in corpus order.
    ///
    /// Always returns one prediction per item; failures degrade to the
    /// sentinel instead of shortening the output.
    pub async fn predict(&self, corpus: &[CorpusItem], prompt: &PromptDoc) -> Vec<Prediction> {
        let rendered = prompt.render();
        let mut predictions = Vec::with_capacity(corpus.len());
        for item in corpus {
            predictions.push(self.predict_item(item, &rendered).await);
        }
        predictions
    }
}
