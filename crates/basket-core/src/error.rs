//! Engine and dialog error types.

use thiserror::Error;

/// Errors produced inside a dialog step.
#[derive(Debug, Error)]
pub enum DialogError {
    /// The frame's options payload does not have the shape the dialog documented.
    /// This is a contract error between dialogs, not a user mistake.
    #[error("invalid options for dialog '{dialog_id}': {message}")]
    InvalidOptions { dialog_id: String, message: String },

    /// A step received input it cannot interpret after a synchronous transition.
    #[error("invalid step input: {0}")]
    InvalidInput(String),

    /// An external collaborator failed in a way the dialog chose not to recover from.
    #[error("external call failed: {0}")]
    External(String),

    /// A value the dialog produced itself failed to serialize.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl DialogError {
    /// Shorthand for an options contract violation.
    pub fn invalid_options(dialog_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidOptions {
            dialog_id: dialog_id.into(),
            message: message.into(),
        }
    }
}

/// Engine-level failures. A failed turn rolls conversation state back to
/// the snapshot taken before the turn began.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unknown dialog id: {0}")]
    UnknownDialog(String),

    #[error("dialog '{dialog_id}' step {step_index} failed: {source}")]
    Step {
        dialog_id: String,
        step_index: usize,
        #[source]
        source: DialogError,
    },

    #[error("turn exceeded {0} step transitions")]
    TransitionLimit(usize),

    #[error("internal error: {0}")]
    Internal(String),
}
