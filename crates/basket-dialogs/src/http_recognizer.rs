//! HTTP recognizer client against a LUIS-style prediction endpoint.

use async_trait::async_trait;
use serde::Deserialize;

use basket_core::types::Unit;

use crate::recognizer::{Entities, Intent, Recognition, Recognizer, RecognizerError};

/// HttpRecognizer configuration.
#[derive(Debug, Clone)]
pub struct HttpRecognizerConfig {
    /// Base endpoint URL, i.e. "https://westeurope.api.cognitive.microsoft.com".
    pub endpoint: String,
    /// Application id of the published shopping list model.
    pub app_id: String,
    /// Subscription key sent with every prediction request.
    pub api_key: String,
    /// Publish slot to query.
    pub slot: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for HttpRecognizerConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            app_id: String::new(),
            api_key: String::new(),
            slot: "production".to_string(),
            timeout_secs: 15,
        }
    }
}

impl HttpRecognizerConfig {
    /// Configured means every credential field is present.
    pub fn is_complete(&self) -> bool {
        !self.endpoint.trim().is_empty()
            && !self.app_id.trim().is_empty()
            && !self.api_key.trim().is_empty()
    }
}

/// Recognizer backed by the remote prediction API.
pub struct HttpRecognizer {
    client: reqwest::Client,
    config: HttpRecognizerConfig,
}

impl HttpRecognizer {
    pub fn new(config: HttpRecognizerConfig) -> Result<Self, RecognizerError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RecognizerError::Http(e.to_string()))?;
        Ok(Self { client, config })
    }

    fn predict_url(&self) -> String {
        format!(
            "{}/luis/prediction/v3.0/apps/{}/slots/{}/predict",
            self.config.endpoint.trim_end_matches('/'),
            self.config.app_id,
            self.config.slot
        )
    }
}

// Prediction API response structures

#[derive(Debug, Deserialize)]
struct PredictionResponse {
    prediction: Prediction,
}

#[derive(Debug, Deserialize)]
struct Prediction {
    #[serde(rename = "topIntent")]
    top_intent: String,
    #[serde(default)]
    entities: PredictionEntities,
}

#[derive(Debug, Default, Deserialize)]
struct PredictionEntities {
    #[serde(rename = "ItemName", default)]
    item_name: Vec<String>,
    /// List entities arrive as one nested list per mention.
    #[serde(rename = "UnitName", default)]
    unit_name: Vec<Vec<String>>,
    #[serde(default)]
    number: Vec<f64>,
    #[serde(default)]
    ordinal: Vec<f64>,
}

/// Map a raw prediction onto the dialogs' view of it. A number plus an
/// optional unit name becomes a unit; an ordinal (or bare number) also
/// doubles as a candidate list position. Which reading applies is the
/// dispatching intent's call.
fn recognition_from_prediction(prediction: Prediction) -> Recognition {
    let entities = &prediction.entities;
    let unit = entities.number.first().map(|value| Unit {
        unit_name: entities
            .unit_name
            .first()
            .and_then(|names| names.first())
            .cloned(),
        value: *value,
    });
    let position = entities
        .ordinal
        .first()
        .or_else(|| entities.number.first())
        .filter(|value| value.fract() == 0.0 && **value >= 1.0)
        .map(|value| *value as u32);

    Recognition {
        intent: Intent::from_name(&prediction.top_intent),
        entities: Entities {
            item_name: entities.item_name.first().cloned(),
            unit,
            position,
        },
    }
}

#[async_trait]
impl Recognizer for HttpRecognizer {
    fn is_configured(&self) -> bool {
        self.config.is_complete()
    }

    async fn recognize(
        &self,
        _conversation_id: &str,
        utterance: &str,
    ) -> Result<Recognition, RecognizerError> {
        if !self.is_configured() {
            return Err(RecognizerError::NotConfigured);
        }
        let response = self
            .client
            .get(self.predict_url())
            .query(&[
                ("subscription-key", self.config.api_key.as_str()),
                ("query", utterance),
                ("verbose", "false"),
            ])
            .send()
            .await
            .map_err(|e| RecognizerError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RecognizerError::Status(status.as_u16()));
        }
        let parsed: PredictionResponse = response
            .json()
            .await
            .map_err(|e| RecognizerError::Malformed(e.to_string()))?;
        Ok(recognition_from_prediction(parsed.prediction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn prediction(raw: serde_json::Value) -> Prediction {
        serde_json::from_value(raw).unwrap()
    }

    #[test]
    fn test_add_item_prediction_yields_unit() {
        let recognition = recognition_from_prediction(prediction(json!({
            "topIntent": "AddItem",
            "entities": {
                "ItemName": ["bananas"],
                "UnitName": [["kg"]],
                "number": [2.0]
            }
        })));

        assert_eq!(recognition.intent, Intent::AddItem);
        assert_eq!(recognition.entities.item_name.as_deref(), Some("bananas"));
        let unit = recognition.entities.unit.unwrap();
        assert_eq!(unit.unit_name.as_deref(), Some("kg"));
        assert_eq!(unit.value, 2.0);
    }

    #[test]
    fn test_ordinal_wins_over_number_for_position() {
        let recognition = recognition_from_prediction(prediction(json!({
            "topIntent": "MarkItem",
            "entities": { "ordinal": [1.0], "number": [5.0] }
        })));
        assert_eq!(recognition.entities.position, Some(1));
    }

    #[test]
    fn test_fractional_number_is_no_position() {
        let recognition = recognition_from_prediction(prediction(json!({
            "topIntent": "RemoveItem",
            "entities": { "number": [2.5] }
        })));
        assert_eq!(recognition.entities.position, None);
        assert_eq!(recognition.entities.unit.map(|u| u.value), Some(2.5));
    }

    #[test]
    fn test_missing_entities_parse_to_defaults() {
        let recognition = recognition_from_prediction(prediction(json!({
            "topIntent": "GetAll"
        })));
        assert_eq!(recognition.intent, Intent::GetAll);
        assert_eq!(recognition.entities, Entities::default());
    }
}
