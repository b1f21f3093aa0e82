//! ItemStore trait and store errors.

use async_trait::async_trait;
use thiserror::Error;

use basket_core::types::{Item, ItemDraft, ItemPatch};

/// Store error types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("item not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    Invalid(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("http error: {0}")]
    Http(String),

    #[error("unexpected status: {0}")]
    Status(u16),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Conversation-scoped access to the shopping list backend.
///
/// Implementations own the list consistency policy: an added item gets
/// position `len + 1`, a removal decrements every greater position by
/// one, and no operation ever produces duplicate or non-contiguous
/// positions within one conversation's list.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Current snapshot of one conversation's list, ordered by position.
    async fn fetch_items(&self, conversation_id: &str) -> Result<Vec<Item>, StoreError>;

    /// Persist a new item at the end of the list and return it.
    async fn add_item(&self, conversation_id: &str, draft: ItemDraft) -> Result<Item, StoreError>;

    /// Delete one item by id and renumber the remainder.
    async fn remove_item(&self, conversation_id: &str, item_id: &str) -> Result<(), StoreError>;

    /// Delete one item by its list position and renumber the remainder.
    /// Returns the removed item.
    async fn remove_item_by_position(
        &self,
        conversation_id: &str,
        position: u32,
    ) -> Result<Item, StoreError>;

    /// Delete every item of one conversation's list.
    async fn remove_all_items(&self, conversation_id: &str) -> Result<(), StoreError>;

    /// Update fields of one item in place and return the updated item.
    /// Positions are never patched.
    async fn patch_item(
        &self,
        conversation_id: &str,
        item_id: &str,
        patch: ItemPatch,
    ) -> Result<Item, StoreError>;
}
