//! Interrupt screening for help / cancel commands.
//!
//! Screening runs before an inbound message reaches the active dialog, at
//! every nesting depth. Only exact, case-insensitive, whole-message matches
//! count; "please cancel the milk" is ordinary dialog input.

use serde::{Deserialize, Serialize};

/// Outcome of screening one inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptAction {
    /// Not an interrupt, deliver to the active dialog unchanged.
    None,
    /// Emit help text and re-issue the current prompt; stack unchanged.
    Help,
    /// Cancel every active dialog.
    Cancel,
}

/// The fixed interrupt vocabulary and the texts it produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterruptPolicy {
    pub help_text: String,
    pub cancel_text: String,
}

impl Default for InterruptPolicy {
    fn default() -> Self {
        Self {
            help_text: "I keep a shopping list for you. Try \"Add 2 kg bananas\", \
                        \"Show my list\", \"Mark the first item\" or \"Remove apples\". \
                        Say \"cancel\" to stop what we are doing."
                .to_string(),
            cancel_text: "Cancelling...".to_string(),
        }
    }
}

impl InterruptPolicy {
    /// Classify one inbound message.
    pub fn screen(&self, text: &str) -> InterruptAction {
        match text.trim().to_lowercase().as_str() {
            "help" | "?" => InterruptAction::Help,
            "cancel" | "quit" => InterruptAction::Cancel,
            _ => InterruptAction::None,
        }
    }
}
