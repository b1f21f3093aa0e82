//! In-memory ItemStore implementation for development and testing.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use basket_core::types::{Item, ItemDraft, ItemPatch};

use crate::item_store::{ItemStore, StoreError};

/// In-memory shopping lists keyed by conversation id.
///
/// Delete and renumber happen under one write lock, so the position
/// invariant holds atomically per conversation.
#[derive(Default)]
pub struct InMemoryItemStore {
    lists: RwLock<HashMap<String, Vec<Item>>>,
}

impl InMemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn validate_draft(draft: &ItemDraft) -> Result<(), StoreError> {
        if draft.item_name.trim().is_empty() {
            return Err(StoreError::Invalid("itemName must not be empty".to_string()));
        }
        if let Some(unit) = &draft.unit {
            if !(unit.value > 0.0) {
                return Err(StoreError::Invalid("unit value must be > 0".to_string()));
            }
        }
        Ok(())
    }

    /// Decrement the position of every item behind the removed one.
    fn renumber_after_removal(list: &mut [Item], removed_position: u32) {
        for item in list.iter_mut() {
            if item.position_in_shopping_list > removed_position {
                item.position_in_shopping_list -= 1;
            }
        }
    }
}

#[async_trait]
impl ItemStore for InMemoryItemStore {
    async fn fetch_items(&self, conversation_id: &str) -> Result<Vec<Item>, StoreError> {
        let lists = self
            .lists
            .read()
            .map_err(|e| StoreError::Internal(e.to_string()))?;
        let mut items = lists.get(conversation_id).cloned().unwrap_or_default();
        items.sort_by_key(|item| item.position_in_shopping_list);
        Ok(items)
    }

    async fn add_item(&self, conversation_id: &str, draft: ItemDraft) -> Result<Item, StoreError> {
        Self::validate_draft(&draft)?;
        let mut lists = self
            .lists
            .write()
            .map_err(|e| StoreError::Internal(e.to_string()))?;
        let list = lists.entry(conversation_id.to_string()).or_default();
        let item = Item {
            id: Some(Uuid::new_v4().to_string()),
            item_name: draft.item_name,
            marked: false,
            position_in_shopping_list: list.len() as u32 + 1,
            unit: draft.unit,
        };
        list.push(item.clone());
        Ok(item)
    }

    async fn remove_item(&self, conversation_id: &str, item_id: &str) -> Result<(), StoreError> {
        let mut lists = self
            .lists
            .write()
            .map_err(|e| StoreError::Internal(e.to_string()))?;
        let list = lists
            .get_mut(conversation_id)
            .ok_or_else(|| StoreError::NotFound(conversation_id.to_string()))?;
        let index = list
            .iter()
            .position(|item| item.id.as_deref() == Some(item_id))
            .ok_or_else(|| StoreError::NotFound(item_id.to_string()))?;
        let removed = list.remove(index);
        Self::renumber_after_removal(list, removed.position_in_shopping_list);
        Ok(())
    }

    async fn remove_item_by_position(
        &self,
        conversation_id: &str,
        position: u32,
    ) -> Result<Item, StoreError> {
        let mut lists = self
            .lists
            .write()
            .map_err(|e| StoreError::Internal(e.to_string()))?;
        let list = lists
            .get_mut(conversation_id)
            .ok_or_else(|| StoreError::NotFound(conversation_id.to_string()))?;
        let index = list
            .iter()
            .position(|item| item.position_in_shopping_list == position)
            .ok_or_else(|| StoreError::NotFound(format!("position {position}")))?;
        let removed = list.remove(index);
        Self::renumber_after_removal(list, removed.position_in_shopping_list);
        Ok(removed)
    }

    async fn remove_all_items(&self, conversation_id: &str) -> Result<(), StoreError> {
        let mut lists = self
            .lists
            .write()
            .map_err(|e| StoreError::Internal(e.to_string()))?;
        lists.remove(conversation_id);
        Ok(())
    }

    async fn patch_item(
        &self,
        conversation_id: &str,
        item_id: &str,
        patch: ItemPatch,
    ) -> Result<Item, StoreError> {
        let mut lists = self
            .lists
            .write()
            .map_err(|e| StoreError::Internal(e.to_string()))?;
        let list = lists
            .get_mut(conversation_id)
            .ok_or_else(|| StoreError::NotFound(conversation_id.to_string()))?;
        let item = list
            .iter_mut()
            .find(|item| item.id.as_deref() == Some(item_id))
            .ok_or_else(|| StoreError::NotFound(item_id.to_string()))?;
        if let Some(name) = patch.item_name {
            if name.trim().is_empty() {
                return Err(StoreError::Invalid("itemName must not be empty".to_string()));
            }
            item.item_name = name;
        }
        if let Some(marked) = patch.marked {
            item.marked = marked;
        }
        if let Some(unit) = patch.unit {
            if !(unit.value > 0.0) {
                return Err(StoreError::Invalid("unit value must be > 0".to_string()));
            }
            item.unit = Some(unit);
        }
        Ok(item.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use basket_core::types::Unit;

    fn draft(name: &str) -> ItemDraft {
        ItemDraft {
            item_name: name.to_string(),
            unit: None,
        }
    }

    fn positions(items: &[Item]) -> Vec<u32> {
        items.iter().map(|i| i.position_in_shopping_list).collect()
    }

    #[test]
    fn test_add_assigns_next_position() {
        tokio_test::block_on(async {
            let store = InMemoryItemStore::new();
            let a = store.add_item("conv", draft("milk")).await.unwrap();
            let b = store.add_item("conv", draft("eggs")).await.unwrap();

            assert_eq!(a.position_in_shopping_list, 1);
            assert_eq!(b.position_in_shopping_list, 2);
            assert!(a.id.is_some());
        });
    }

    #[test]
    fn test_remove_renumbers_to_contiguous_positions() {
        tokio_test::block_on(async {
            let store = InMemoryItemStore::new();
            let _a = store.add_item("conv", draft("milk")).await.unwrap();
            let b = store.add_item("conv", draft("eggs")).await.unwrap();
            let _c = store.add_item("conv", draft("flour")).await.unwrap();

            store
                .remove_item("conv", b.id.as_deref().unwrap())
                .await
                .unwrap();

            let items = store.fetch_items("conv").await.unwrap();
            assert_eq!(positions(&items), vec![1, 2]);
            assert_eq!(items[1].item_name, "flour");
        });
    }

    #[test]
    fn test_remove_by_position_returns_removed_item() {
        tokio_test::block_on(async {
            let store = InMemoryItemStore::new();
            store.add_item("conv", draft("milk")).await.unwrap();
            store.add_item("conv", draft("eggs")).await.unwrap();

            let removed = store.remove_item_by_position("conv", 1).await.unwrap();
            assert_eq!(removed.item_name, "milk");

            let items = store.fetch_items("conv").await.unwrap();
            assert_eq!(positions(&items), vec![1]);
            assert_eq!(items[0].item_name, "eggs");
        });
    }

    #[test]
    fn test_position_contiguity_after_arbitrary_operations() {
        tokio_test::block_on(async {
            let store = InMemoryItemStore::new();
            // Deterministic pseudo-random add/remove sequence.
            let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
            for round in 0..200u32 {
                seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                let items = store.fetch_items("conv").await.unwrap();
                if items.is_empty() || seed % 3 != 0 {
                    store
                        .add_item("conv", draft(&format!("item-{round}")))
                        .await
                        .unwrap();
                } else {
                    let victim = &items[(seed as usize / 3) % items.len()];
                    store
                        .remove_item("conv", victim.id.as_deref().unwrap())
                        .await
                        .unwrap();
                }

                let items = store.fetch_items("conv").await.unwrap();
                let expected: Vec<u32> = (1..=items.len() as u32).collect();
                assert_eq!(positions(&items), expected);
            }
        });
    }

    #[test]
    fn test_patch_flips_marked_without_touching_positions() {
        tokio_test::block_on(async {
            let store = InMemoryItemStore::new();
            store.add_item("conv", draft("milk")).await.unwrap();
            let b = store.add_item("conv", draft("eggs")).await.unwrap();

            let patched = store
                .patch_item("conv", b.id.as_deref().unwrap(), ItemPatch::marked(true))
                .await
                .unwrap();
            assert!(patched.marked);
            assert_eq!(patched.position_in_shopping_list, 2);
        });
    }

    #[test]
    fn test_validation_rejects_bad_drafts() {
        tokio_test::block_on(async {
            let store = InMemoryItemStore::new();
            assert!(matches!(
                store.add_item("conv", draft("  ")).await,
                Err(StoreError::Invalid(_))
            ));
            let bad_unit = ItemDraft {
                item_name: "milk".to_string(),
                unit: Some(Unit::new(Some("l".to_string()), 0.0)),
            };
            assert!(matches!(
                store.add_item("conv", bad_unit).await,
                Err(StoreError::Invalid(_))
            ));
        });
    }

    #[test]
    fn test_remove_all_clears_only_one_conversation() {
        tokio_test::block_on(async {
            let store = InMemoryItemStore::new();
            store.add_item("a", draft("milk")).await.unwrap();
            store.add_item("b", draft("eggs")).await.unwrap();

            store.remove_all_items("a").await.unwrap();

            assert!(store.fetch_items("a").await.unwrap().is_empty());
            assert_eq!(store.fetch_items("b").await.unwrap().len(), 1);
        });
    }
}
