use std::sync::Arc;

use kg_embed_core::provider::TextEncoder;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub encoder: Arc<dyn TextEncoder>,
}

impl AppState {
    pub fn new(encoder: Arc<dyn TextEncoder>) -> Self {
        Self { encoder }
    }
}
