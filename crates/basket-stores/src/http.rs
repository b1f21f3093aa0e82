//! HTTP client implementation of ItemStore.
//!
//! Speaks the shopping list REST API: one route per operation, JSON
//! bodies in the same camelCase shape as the item model. Whether delete
//! and renumber are transactional is the remote store's guarantee, not
//! something this client can add.

use async_trait::async_trait;
use serde::Deserialize;

use basket_core::types::{Item, ItemDraft, ItemPatch};

use crate::item_store::{ItemStore, StoreError};

/// HttpItemStore configuration.
#[derive(Debug, Clone)]
pub struct HttpItemStoreConfig {
    /// Base URL of the API, i.e. "https://lists.example.net/api".
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for HttpItemStoreConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:7071/api".to_string(),
            timeout_secs: 30,
        }
    }
}

/// ItemStore backed by the remote list API.
pub struct HttpItemStore {
    client: reqwest::Client,
    config: HttpItemStoreConfig,
}

/// Patch responses wrap the updated item.
#[derive(Debug, Deserialize)]
struct PatchEnvelope {
    item: Item,
}

impl HttpItemStore {
    pub fn new(config: HttpItemStoreConfig) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StoreError::Http(e.to_string()))?;
        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn check_status(response: &reqwest::Response) -> Result<(), StoreError> {
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(
                response.url().path().to_string(),
            ));
        }
        if !status.is_success() {
            return Err(StoreError::Status(status.as_u16()));
        }
        Ok(())
    }
}

#[async_trait]
impl ItemStore for HttpItemStore {
    async fn fetch_items(&self, conversation_id: &str) -> Result<Vec<Item>, StoreError> {
        let response = self
            .client
            .get(self.url(&format!("GetItemsFunction/{conversation_id}")))
            .send()
            .await
            .map_err(|e| StoreError::Http(e.to_string()))?;
        Self::check_status(&response)?;
        let mut items: Vec<Item> = response
            .json()
            .await
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        items.sort_by_key(|item| item.position_in_shopping_list);
        Ok(items)
    }

    async fn add_item(&self, conversation_id: &str, draft: ItemDraft) -> Result<Item, StoreError> {
        let response = self
            .client
            .post(self.url(&format!("AddItemFunction/{conversation_id}")))
            .json(&draft)
            .send()
            .await
            .map_err(|e| StoreError::Http(e.to_string()))?;
        Self::check_status(&response)?;
        response
            .json()
            .await
            .map_err(|e| StoreError::Serialization(e.to_string()))
    }

    async fn remove_item(&self, conversation_id: &str, item_id: &str) -> Result<(), StoreError> {
        let response = self
            .client
            .delete(self.url(&format!(
                "RemoveItemByIDFunction/{conversation_id}/{item_id}"
            )))
            .send()
            .await
            .map_err(|e| StoreError::Http(e.to_string()))?;
        Self::check_status(&response)
    }

    async fn remove_item_by_position(
        &self,
        conversation_id: &str,
        position: u32,
    ) -> Result<Item, StoreError> {
        let response = self
            .client
            .delete(self.url(&format!(
                "RemoveItemByPositionFunction/{conversation_id}/{position}"
            )))
            .send()
            .await
            .map_err(|e| StoreError::Http(e.to_string()))?;
        Self::check_status(&response)?;
        response
            .json()
            .await
            .map_err(|e| StoreError::Serialization(e.to_string()))
    }

    async fn remove_all_items(&self, conversation_id: &str) -> Result<(), StoreError> {
        let response = self
            .client
            .delete(self.url(&format!("RemoveAllItemsFunction/{conversation_id}")))
            .send()
            .await
            .map_err(|e| StoreError::Http(e.to_string()))?;
        Self::check_status(&response)
    }

    async fn patch_item(
        &self,
        conversation_id: &str,
        item_id: &str,
        patch: ItemPatch,
    ) -> Result<Item, StoreError> {
        let response = self
            .client
            .patch(self.url(&format!("UpdateItem/{conversation_id}/{item_id}")))
            .json(&patch)
            .send()
            .await
            .map_err(|e| StoreError::Http(e.to_string()))?;
        Self::check_status(&response)?;
        let envelope: PatchEnvelope = response
            .json()
            .await
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(envelope.item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let store = HttpItemStore::new(HttpItemStoreConfig {
            base_url: "http://localhost:7071/api/".to_string(),
            timeout_secs: 5,
        })
        .unwrap();
        assert_eq!(
            store.url("GetItemsFunction/conv-1"),
            "http://localhost:7071/api/GetItemsFunction/conv-1"
        );
    }
}
