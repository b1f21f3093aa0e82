//! # Basket Runtime
//!
//! The bot's turn processing surface. One call to
//! [`TurnRuntime::handle_turn`] is one inbound chat message: load the
//! conversation's dialog state, run the engine, persist the new state,
//! hand back the outbound messages.
//!
//! Failure policy: engine errors abort the turn without persisting
//! (the engine already rolled its state back), and the user gets a
//! plain apology instead of internals. Only state-store failures
//! surface to the host, which owes durable persistence before
//! acknowledging the message anyway.

use std::sync::Arc;

use thiserror::Error;

use basket_core::{ConversationState, DialogEngine, OutboundMessage};
use basket_stores::{StateStore, StoreError};

const TURN_FAILED: &str = "Sorry, something went wrong on my end. Let's start over.";

/// Runtime errors
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("state store error: {0}")]
    State(#[from] StoreError),
}

/// Turn processor for every conversation served by this bot instance.
pub struct TurnRuntime {
    engine: DialogEngine,
    state_store: Arc<dyn StateStore>,
}

impl TurnRuntime {
    pub fn new(engine: DialogEngine, state_store: Arc<dyn StateStore>) -> Self {
        Self {
            engine,
            state_store,
        }
    }

    /// Process one inbound message for one conversation.
    pub async fn handle_turn(
        &self,
        conversation_id: &str,
        text: &str,
    ) -> Result<Vec<OutboundMessage>, RuntimeError> {
        let mut state = self
            .state_store
            .load(conversation_id)
            .await?
            .unwrap_or_else(ConversationState::new);

        match self.engine.handle_turn(&mut state, conversation_id, text).await {
            Ok(output) => {
                self.state_store.save(conversation_id, &state).await?;
                tracing::debug!(
                    conversation_id,
                    status = ?output.status,
                    responses = output.responses.len(),
                    "turn processed"
                );
                Ok(output.responses)
            }
            Err(err) => {
                // State was rolled back by the engine; keep the persisted
                // copy untouched so the conversation resumes cleanly.
                tracing::error!(conversation_id, error = %err, "turn failed, state not persisted");
                Ok(vec![OutboundMessage::ignoring(TURN_FAILED)])
            }
        }
    }
}
