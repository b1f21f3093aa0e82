//! Conversation state persistence.
//!
//! The engine mutates a ConversationState per turn; the host decides
//! where it lives between turns. Saving before acknowledging the inbound
//! message is the host's obligation.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use basket_core::state::ConversationState;

use crate::item_store::StoreError;

/// Persisted dialog state keyed by conversation id.
#[async_trait]
pub trait StateStore: Send + Sync {
    async fn load(&self, conversation_id: &str) -> Result<Option<ConversationState>, StoreError>;

    async fn save(
        &self,
        conversation_id: &str,
        state: &ConversationState,
    ) -> Result<(), StoreError>;
}

/// In-memory implementation for development and testing.
#[derive(Default)]
pub struct InMemoryStateStore {
    states: RwLock<HashMap<String, ConversationState>>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateStore for InMemoryStateStore {
    async fn load(&self, conversation_id: &str) -> Result<Option<ConversationState>, StoreError> {
        let states = self
            .states
            .read()
            .map_err(|e| StoreError::Internal(e.to_string()))?;
        Ok(states.get(conversation_id).cloned())
    }

    async fn save(
        &self,
        conversation_id: &str,
        state: &ConversationState,
    ) -> Result<(), StoreError> {
        let mut states = self
            .states
            .write()
            .map_err(|e| StoreError::Internal(e.to_string()))?;
        states.insert(conversation_id.to_string(), state.clone());
        Ok(())
    }
}
