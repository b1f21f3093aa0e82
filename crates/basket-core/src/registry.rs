//! Dialog registry: dialog id -> step table, resolved by lookup at
//! dispatch time. Adding a dialog kind is a registration, not a subclass.

use std::collections::HashMap;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use serde_json::Value;

use crate::error::{DialogError, EngineError};
use crate::outcome::{OutboundMessage, StepOutcome};

/// Everything one step invocation can see and do.
pub struct StepContext {
    pub conversation_id: String,
    /// Options handed to the frame at push time (possibly updated by an
    /// earlier step of the same frame).
    pub options: Value,
    /// The value feeding this invocation: the user's reply, a `Next`
    /// value, or a finished child dialog's result. None on first entry.
    pub input: Option<Value>,
    responses: Vec<OutboundMessage>,
    updated_options: Option<Value>,
}

impl StepContext {
    pub fn new(conversation_id: impl Into<String>, options: Value, input: Option<Value>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            options,
            input,
            responses: Vec::new(),
            updated_options: None,
        }
    }

    /// Send a message without ending the step.
    pub fn send(&mut self, message: OutboundMessage) {
        self.responses.push(message);
    }

    /// The input as a text reply, trimmed. None when the input is absent
    /// or not a string.
    pub fn input_text(&self) -> Option<&str> {
        self.input.as_ref().and_then(Value::as_str).map(str::trim)
    }

    /// Persist new options on the current frame, visible to this frame's
    /// later steps. The waterfall equivalent of accumulating state.
    pub fn update_options(&mut self, options: Value) {
        self.updated_options = Some(options);
    }

    pub(crate) fn take_responses(&mut self) -> Vec<OutboundMessage> {
        std::mem::take(&mut self.responses)
    }

    pub(crate) fn take_updated_options(&mut self) -> Option<Value> {
        self.updated_options.take()
    }
}

/// Deserialize a frame's options into the shape the dialog documented.
/// A mismatch is a contract error between dialogs, not a user mistake.
pub fn parse_options<T: serde::de::DeserializeOwned>(
    dialog_id: &str,
    options: &Value,
) -> Result<T, DialogError> {
    serde_json::from_value(options.clone())
        .map_err(|err| DialogError::invalid_options(dialog_id, err.to_string()))
}

/// Serialize a value a dialog hands to the engine (options or results).
pub fn to_value<T: serde::Serialize>(value: &T) -> Result<Value, DialogError> {
    serde_json::to_value(value).map_err(|err| DialogError::Serialization(err.to_string()))
}

/// One waterfall step: an async function from step context to outcome.
pub type StepFn = Arc<
    dyn for<'a> Fn(&'a mut StepContext) -> BoxFuture<'a, Result<StepOutcome, DialogError>>
        + Send
        + Sync,
>;

/// Wrap an async closure as a step. Exists so closures at call sites get
/// the higher-ranked signature inferred.
pub fn step<F>(f: F) -> StepFn
where
    F: for<'a> Fn(&'a mut StepContext) -> BoxFuture<'a, Result<StepOutcome, DialogError>>
        + Send
        + Sync
        + 'static,
{
    Arc::new(f)
}

/// An ordered step table plus per-dialog flags.
#[derive(Clone)]
pub struct DialogSpec {
    steps: Vec<StepFn>,
    interruptible: bool,
}

impl DialogSpec {
    pub fn new(steps: Vec<StepFn>) -> Self {
        Self {
            steps,
            interruptible: true,
        }
    }

    /// Opt this dialog out of help/cancel screening. No built-in dialog
    /// uses this; it exists for raw-capture dialogs.
    pub fn uninterruptible(mut self) -> Self {
        self.interruptible = false;
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step(&self, index: usize) -> Option<&StepFn> {
        self.steps.get(index)
    }

    pub fn is_interruptible(&self) -> bool {
        self.interruptible
    }
}

/// The closed set of dialogs known to the engine.
#[derive(Default, Clone)]
pub struct DialogRegistry {
    dialogs: HashMap<String, DialogSpec>,
}

impl DialogRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a dialog under an id. Re-registering an id replaces it.
    pub fn register(&mut self, dialog_id: impl Into<String>, spec: DialogSpec) -> &mut Self {
        self.dialogs.insert(dialog_id.into(), spec);
        self
    }

    pub fn get(&self, dialog_id: &str) -> Option<&DialogSpec> {
        self.dialogs.get(dialog_id)
    }

    /// Lookup that turns a missing id into the engine error every caller wants.
    pub fn resolve(&self, dialog_id: &str) -> Result<&DialogSpec, EngineError> {
        self.dialogs
            .get(dialog_id)
            .ok_or_else(|| EngineError::UnknownDialog(dialog_id.to_string()))
    }

    pub fn contains(&self, dialog_id: &str) -> bool {
        self.dialogs.contains_key(dialog_id)
    }

    pub fn names(&self) -> Vec<String> {
        self.dialogs.keys().cloned().collect()
    }
}
