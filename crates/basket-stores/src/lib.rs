//! # Basket Stores
//!
//! Storage abstractions and implementations for the basket bot:
//! - ItemStore: the shopping list backend (async trait)
//! - StateStore: conversation dialog-state persistence (async trait)
//! - In-memory implementations for development and testing
//! - An HTTP client implementation speaking the list backend's REST API
//!
//! The in-memory item store is also where the list consistency policy
//! lives: positions stay unique and contiguous through every add/remove.

mod http;
mod item_store;
mod memory;
mod state_store;

pub use http::{HttpItemStore, HttpItemStoreConfig};
pub use item_store::{ItemStore, StoreError};
pub use memory::InMemoryItemStore;
pub use state_store::{InMemoryStateStore, StateStore};
