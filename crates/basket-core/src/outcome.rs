//! Step outcomes, turn results and outbound messages.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Hint sent along with a message: whether the bot expects a reply to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputHint {
    /// The bot is waiting for the user to answer this message.
    ExpectingInput,
    /// Informational message, no reply expected.
    IgnoringInput,
}

/// One chat message produced during a turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub text: String,
    pub input_hint: InputHint,
}

impl OutboundMessage {
    /// A message the user is expected to answer.
    pub fn expecting(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            input_hint: InputHint::ExpectingInput,
        }
    }

    /// An informational message.
    pub fn ignoring(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            input_hint: InputHint::IgnoringInput,
        }
    }
}

/// What a single step invocation produced. Exactly one per invocation;
/// a step never both prompts and advances.
#[derive(Debug)]
pub enum StepOutcome {
    /// Emit the prompt and suspend. The next inbound message is delivered
    /// to the same step as its input.
    Prompt(OutboundMessage),
    /// Advance to the following step within the same turn, handing it the value.
    Next(Value),
    /// Push a child dialog. The current dialog resumes at the step after
    /// this one once the child ends, receiving the child's result.
    BeginChild { dialog_id: String, options: Value },
    /// Pop this dialog, handing the value to the parent (or to the caller
    /// when this was the last frame).
    End(Value),
    /// Pop this dialog and start another in its place with fresh state.
    Replace { dialog_id: String, options: Value },
}

impl StepOutcome {
    pub fn begin_child(dialog_id: impl Into<String>, options: Value) -> Self {
        Self::BeginChild {
            dialog_id: dialog_id.into(),
            options,
        }
    }

    pub fn replace(dialog_id: impl Into<String>, options: Value) -> Self {
        Self::Replace {
            dialog_id: dialog_id.into(),
            options,
        }
    }
}

/// How a turn ended.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnStatus {
    /// No dialog is active.
    Empty,
    /// The active dialog issued a prompt and waits for the next message.
    Waiting,
    /// The stack unwound completely; the last dialog returned this value.
    /// Surfaced for diagnostics, normally ignored by the host.
    Complete(Value),
    /// An interrupt cancelled every active dialog.
    Cancelled,
}

/// Everything one processed turn handed back to the host.
#[derive(Debug)]
pub struct TurnOutput {
    pub status: TurnStatus,
    pub responses: Vec<OutboundMessage>,
}
