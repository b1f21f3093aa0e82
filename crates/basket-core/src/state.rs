//! Persisted per-conversation dialog state.
//!
//! A conversation owns exactly one DialogStack. The stack survives between
//! turns in whatever store the host chose; everything here is plain serde
//! data so the host can persist it as JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::outcome::OutboundMessage;

fn default_true() -> bool {
    true
}

/// One active (or suspended) instance of a dialog on the stack.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogFrame {
    pub dialog_id: String,
    /// Index of the step the next input is delivered to.
    pub step_index: usize,
    /// Opaque payload handed over at push time.
    #[serde(default)]
    pub options: Value,
    /// True while the frame's current step waits for the next message.
    pub waiting_for_input: bool,
    /// Interrupt vocabulary applies unless the dialog opted out at registration.
    #[serde(default = "default_true")]
    pub interruptible: bool,
    /// Last prompt this frame issued, re-sent after a help interrupt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_prompt: Option<OutboundMessage>,
}

impl DialogFrame {
    pub fn new(dialog_id: impl Into<String>, options: Value, interruptible: bool) -> Self {
        Self {
            dialog_id: dialog_id.into(),
            step_index: 0,
            options,
            waiting_for_input: false,
            interruptible,
            last_prompt: None,
        }
    }
}

/// Ordered frames, top = most recently pushed = currently active.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DialogStack {
    frames: Vec<DialogFrame>,
}

impl DialogStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn top(&self) -> Option<&DialogFrame> {
        self.frames.last()
    }

    pub fn top_mut(&mut self) -> Option<&mut DialogFrame> {
        self.frames.last_mut()
    }

    pub fn push(&mut self, frame: DialogFrame) {
        self.frames.push(frame);
    }

    pub fn pop(&mut self) -> Option<DialogFrame> {
        self.frames.pop()
    }

    /// Drop every frame without running any further steps.
    pub fn clear(&mut self) {
        self.frames.clear();
    }
}

/// Everything the engine needs between turns for one conversation.
/// Single-owner, single-writer: one turn at a time mutates this.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationState {
    pub stack: DialogStack,
    /// When this conversation last processed a turn.
    pub updated_at: DateTime<Utc>,
}

impl Default for ConversationState {
    fn default() -> Self {
        Self {
            stack: DialogStack::new(),
            updated_at: Utc::now(),
        }
    }
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refresh the last-activity timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stack_push_pop_order() {
        let mut stack = DialogStack::new();
        stack.push(DialogFrame::new("main", Value::Null, true));
        stack.push(DialogFrame::new("child", json!({"q": 1}), true));

        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.top().map(|f| f.dialog_id.as_str()), Some("child"));
        assert_eq!(stack.pop().map(|f| f.dialog_id), Some("child".to_string()));
        assert_eq!(stack.top().map(|f| f.dialog_id.as_str()), Some("main"));
    }

    #[test]
    fn test_state_round_trips_through_json() {
        let mut state = ConversationState::new();
        state
            .stack
            .push(DialogFrame::new("main", json!({"restartMsg": "hi"}), true));
        if let Some(frame) = state.stack.top_mut() {
            frame.step_index = 2;
            frame.waiting_for_input = true;
        }

        let raw = serde_json::to_string(&state).unwrap();
        let restored: ConversationState = serde_json::from_str(&raw).unwrap();
        let top = restored.stack.top().unwrap();
        assert_eq!(top.dialog_id, "main");
        assert_eq!(top.step_index, 2);
        assert!(top.waiting_for_input);
        assert!(top.interruptible);
    }
}
