//! Decoding of model output into structured payloads.

use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;
use serde_with::{DefaultOnError, serde_as};
use tracing::warn;

/// Strictly decode `text` as JSON into `T`.
///
/// Only a JSON object is accepted; derived struct impls would otherwise also take a
/// positional array. Returns `None` on any decode or shape error; callers substitute
/// their own fallback.
pub fn parse<T: DeserializeOwned>(text: &str) -> Option<T> {
    let value = match serde_json::from_str::<Value>(text.trim()) {
        Ok(value @ Value::Object(_)) => value,
        Ok(_) => {
            warn!("Model output is JSON but not an object");
            return None;
        }
        Err(err) => {
            warn!("Model output is not valid JSON: {err}");
            return None;
        }
    };

    match serde_json::from_value(value) {
        Ok(payload) => Some(payload),
        Err(err) => {
            warn!("Model output does not match the expected schema: {err}");
            None
        }
    }
}

/// Analysis payload as returned by the model.
///
/// Every field is optional and a field of the wrong type reads as absent, so one
/// bad key never discards the rest of the payload.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct AnalysisPayload {
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub summary: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub priority: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub sentiment: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub suggested_reply: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub key_points: Option<Vec<String>>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub action_required: Option<bool>,
}

/// Reply-suggestion payload as returned by the model.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct ReplyPayload {
    pub suggested_reply: String,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub tone: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub alternatives: Option<Vec<String>>,
}
