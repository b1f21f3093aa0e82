//! DialogEngine - the reentrant dialog stack state machine.
//!
//! One call to [`DialogEngine::handle_turn`] processes exactly one inbound
//! message: screen interrupts, resume the top frame (or start the default
//! dialog on an empty stack), then drive the waterfall cascade until a
//! step suspends for input or the stack unwinds.
//!
//! The engine owns no I/O and no persistence. It mutates the
//! [`ConversationState`] it is given; a failed turn rolls that state back
//! to the snapshot taken when the turn began.

use std::sync::Arc;

use serde_json::Value;

use crate::error::EngineError;
use crate::interrupt::{InterruptAction, InterruptPolicy};
use crate::outcome::{OutboundMessage, StepOutcome, TurnOutput, TurnStatus};
use crate::registry::{DialogRegistry, StepContext};
use crate::state::{ConversationState, DialogFrame};

/// Engine tuning knobs.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Upper bound on step transitions within one turn. A dialog that
    /// replaces or advances more often than this is looping.
    pub max_transitions: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { max_transitions: 32 }
    }
}

/// What the cascade has to do next.
enum Pending {
    /// Invoke the top frame's current step with this input.
    Invoke(Option<Value>),
    /// The top frame was popped; hand its result to the frame below,
    /// or finish the turn when none remains.
    Unwind(Value),
}

/// The dialog stack engine. Cheap to clone per conversation is not needed:
/// one engine serves every conversation, state travels in per call.
pub struct DialogEngine {
    registry: Arc<DialogRegistry>,
    interrupts: InterruptPolicy,
    default_dialog: String,
    config: EngineConfig,
}

impl DialogEngine {
    /// Create an engine that starts `default_dialog` whenever the stack is empty.
    pub fn new(registry: Arc<DialogRegistry>, default_dialog: impl Into<String>) -> Self {
        Self {
            registry,
            interrupts: InterruptPolicy::default(),
            default_dialog: default_dialog.into(),
            config: EngineConfig::default(),
        }
    }

    pub fn with_interrupts(mut self, interrupts: InterruptPolicy) -> Self {
        self.interrupts = interrupts;
        self
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Process one inbound message. On error the state is rolled back to
    /// what it was before the turn began.
    pub async fn handle_turn(
        &self,
        state: &mut ConversationState,
        conversation_id: &str,
        text: &str,
    ) -> Result<TurnOutput, EngineError> {
        let snapshot = state.clone();
        match self.run_turn(state, conversation_id, text).await {
            Ok(output) => {
                state.touch();
                Ok(output)
            }
            Err(err) => {
                *state = snapshot;
                Err(err)
            }
        }
    }

    /// Push a dialog and run it until it suspends or unwinds. Public so
    /// hosts can start a specific dialog outside the default flow.
    pub async fn begin(
        &self,
        state: &mut ConversationState,
        conversation_id: &str,
        dialog_id: &str,
        options: Value,
    ) -> Result<TurnOutput, EngineError> {
        let spec = self.registry.resolve(dialog_id)?;
        state.stack.push(DialogFrame::new(
            dialog_id,
            options,
            spec.is_interruptible(),
        ));
        self.drive(state, conversation_id, Pending::Invoke(None), Vec::new())
            .await
    }

    /// Pop every frame without running any further steps.
    pub fn cancel_all(&self, state: &mut ConversationState) {
        state.stack.clear();
    }

    async fn run_turn(
        &self,
        state: &mut ConversationState,
        conversation_id: &str,
        text: &str,
    ) -> Result<TurnOutput, EngineError> {
        // Interrupts short-circuit the stack before any dialog resumes.
        if let Some(frame) = state.stack.top() {
            if frame.interruptible {
                match self.interrupts.screen(text) {
                    InterruptAction::Help => {
                        tracing::debug!(conversation_id, "help interrupt");
                        let mut responses =
                            vec![OutboundMessage::expecting(&self.interrupts.help_text)];
                        if let Some(prompt) = frame.last_prompt.clone() {
                            responses.push(prompt);
                        }
                        return Ok(TurnOutput {
                            status: TurnStatus::Waiting,
                            responses,
                        });
                    }
                    InterruptAction::Cancel => {
                        tracing::debug!(conversation_id, depth = state.stack.depth(), "cancel interrupt");
                        self.cancel_all(state);
                        return Ok(TurnOutput {
                            status: TurnStatus::Cancelled,
                            responses: vec![OutboundMessage::ignoring(&self.interrupts.cancel_text)],
                        });
                    }
                    InterruptAction::None => {}
                }
            }
        }

        if state.stack.is_empty() {
            // The designed fresh-turn case, not an error: start the
            // default dialog. The triggering message itself is consumed.
            return self
                .begin(state, conversation_id, self.default_dialog.as_str(), Value::Null)
                .await;
        }

        if let Some(frame) = state.stack.top_mut() {
            frame.waiting_for_input = false;
        }
        self.drive(
            state,
            conversation_id,
            Pending::Invoke(Some(Value::String(text.to_string()))),
            Vec::new(),
        )
        .await
    }

    /// The waterfall cascade. Each iteration performs one transition:
    /// invoke a step and apply its outcome, or unwind one finished frame.
    async fn drive(
        &self,
        state: &mut ConversationState,
        conversation_id: &str,
        mut pending: Pending,
        mut responses: Vec<OutboundMessage>,
    ) -> Result<TurnOutput, EngineError> {
        for _ in 0..self.config.max_transitions {
            match pending {
                Pending::Invoke(input) => {
                    let (dialog_id, step_index, options) = match state.stack.top() {
                        Some(frame) => (
                            frame.dialog_id.clone(),
                            frame.step_index,
                            frame.options.clone(),
                        ),
                        None => {
                            return Err(EngineError::Internal(
                                "invoke with empty stack".to_string(),
                            ))
                        }
                    };
                    let spec = self.registry.resolve(&dialog_id)?;

                    let outcome = if step_index >= spec.len() {
                        // Ran past the last step: the waterfall falls off
                        // the end and the dialog ends with its last value.
                        StepOutcome::End(input.unwrap_or(Value::Null))
                    } else {
                        let step_fn = match spec.step(step_index) {
                            Some(step_fn) => step_fn.clone(),
                            None => {
                                return Err(EngineError::Internal(format!(
                                    "step {step_index} missing in '{dialog_id}'"
                                )))
                            }
                        };
                        let mut ctx = StepContext::new(conversation_id, options, input);
                        let result = step_fn(&mut ctx).await;
                        responses.extend(ctx.take_responses());
                        if let Some(updated) = ctx.take_updated_options() {
                            if let Some(frame) = state.stack.top_mut() {
                                frame.options = updated;
                            }
                        }
                        result.map_err(|source| EngineError::Step {
                            dialog_id: dialog_id.clone(),
                            step_index,
                            source,
                        })?
                    };

                    tracing::trace!(
                        conversation_id,
                        dialog_id = %dialog_id,
                        step_index,
                        outcome = outcome_label(&outcome),
                        "step outcome"
                    );

                    match outcome {
                        StepOutcome::Prompt(message) => {
                            if let Some(frame) = state.stack.top_mut() {
                                frame.waiting_for_input = true;
                                frame.last_prompt = Some(message.clone());
                            }
                            responses.push(message);
                            return Ok(TurnOutput {
                                status: TurnStatus::Waiting,
                                responses,
                            });
                        }
                        StepOutcome::Next(value) => {
                            if let Some(frame) = state.stack.top_mut() {
                                frame.step_index += 1;
                            }
                            pending = Pending::Invoke(Some(value));
                        }
                        StepOutcome::BeginChild { dialog_id, options } => {
                            // Advance the parent first so the child's
                            // result lands on the step after this one.
                            if let Some(frame) = state.stack.top_mut() {
                                frame.step_index += 1;
                            }
                            let child = self.registry.resolve(&dialog_id)?;
                            state.stack.push(DialogFrame::new(
                                dialog_id,
                                options,
                                child.is_interruptible(),
                            ));
                            pending = Pending::Invoke(None);
                        }
                        StepOutcome::End(value) => {
                            state.stack.pop();
                            pending = Pending::Unwind(value);
                        }
                        StepOutcome::Replace { dialog_id, options } => {
                            state.stack.pop();
                            let next = self.registry.resolve(&dialog_id)?;
                            state.stack.push(DialogFrame::new(
                                dialog_id,
                                options,
                                next.is_interruptible(),
                            ));
                            pending = Pending::Invoke(None);
                        }
                    }
                }
                Pending::Unwind(value) => {
                    if state.stack.is_empty() {
                        return Ok(TurnOutput {
                            status: TurnStatus::Complete(value),
                            responses,
                        });
                    }
                    // Parent dialogs resume at the step after their begin
                    // call, receiving the child's result as input.
                    pending = Pending::Invoke(Some(value));
                }
            }
        }
        Err(EngineError::TransitionLimit(self.config.max_transitions))
    }
}

fn outcome_label(outcome: &StepOutcome) -> &'static str {
    match outcome {
        StepOutcome::Prompt(_) => "prompt",
        StepOutcome::Next(_) => "next",
        StepOutcome::BeginChild { .. } => "begin_child",
        StepOutcome::End(_) => "end",
        StepOutcome::Replace { .. } => "replace",
    }
}
