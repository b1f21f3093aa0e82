//! Shared collaborators injected into dialog step closures.

use std::sync::Arc;

use basket_stores::ItemStore;

use crate::recognizer::Recognizer;

/// Everything the dialog set needs from the outside world.
#[derive(Clone)]
pub struct Services {
    pub store: Arc<dyn ItemStore>,
    pub recognizer: Arc<dyn Recognizer>,
}

impl Services {
    pub fn new(store: Arc<dyn ItemStore>, recognizer: Arc<dyn Recognizer>) -> Self {
        Self { store, recognizer }
    }
}
