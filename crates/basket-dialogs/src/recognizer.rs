//! Intent and entity recognition abstraction.
//!
//! The recognizer is a black box to the dialogs: utterance in, intent
//! plus entities out. When none is configured the main dialog falls back
//! to treating every utterance as an AddItem request.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use basket_core::types::Unit;

/// The closed set of intents the dialogs dispatch on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    AddItem,
    GetAll,
    MarkItem,
    UnmarkItem,
    RemoveAll,
    RemoveItem,
    /// Anything the model predicted that the bot has no task for.
    Unrecognized(String),
}

impl Intent {
    pub fn from_name(name: &str) -> Self {
        match name {
            "AddItem" => Intent::AddItem,
            "GetAll" => Intent::GetAll,
            "MarkItem" => Intent::MarkItem,
            "UnmarkItem" => Intent::UnmarkItem,
            "RemoveAll" => Intent::RemoveAll,
            "RemoveItem" => Intent::RemoveItem,
            other => Intent::Unrecognized(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Intent::AddItem => "AddItem",
            Intent::GetAll => "GetAll",
            Intent::MarkItem => "MarkItem",
            Intent::UnmarkItem => "UnmarkItem",
            Intent::RemoveAll => "RemoveAll",
            Intent::RemoveItem => "RemoveItem",
            Intent::Unrecognized(name) => name,
        }
    }
}

/// Entities extracted from one utterance. All optional; dialogs prompt
/// for whatever is missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entities {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<Unit>,
    /// A number usable as a list position ("mark the first item").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
}

/// One recognizer verdict.
#[derive(Debug, Clone)]
pub struct Recognition {
    pub intent: Intent,
    pub entities: Entities,
}

/// Recognizer errors
#[derive(Debug, Error)]
pub enum RecognizerError {
    #[error("recognizer is not configured")]
    NotConfigured,

    #[error("http error: {0}")]
    Http(String),

    #[error("unexpected status: {0}")]
    Status(u16),

    #[error("malformed prediction: {0}")]
    Malformed(String),
}

/// Black-box utterance understanding.
#[async_trait]
pub trait Recognizer: Send + Sync {
    /// False when the service is not set up; dialogs then skip recognition.
    fn is_configured(&self) -> bool;

    async fn recognize(
        &self,
        conversation_id: &str,
        utterance: &str,
    ) -> Result<Recognition, RecognizerError>;
}

/// The always-unconfigured recognizer.
pub struct NoopRecognizer;

#[async_trait]
impl Recognizer for NoopRecognizer {
    fn is_configured(&self) -> bool {
        false
    }

    async fn recognize(
        &self,
        _conversation_id: &str,
        _utterance: &str,
    ) -> Result<Recognition, RecognizerError> {
        Err(RecognizerError::NotConfigured)
    }
}
