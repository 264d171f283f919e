use std::sync::Arc;

use crate::service::EmbeddingGateway;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<EmbeddingGateway>,
    pub api_key_configured: bool,
}

impl AppState {
    pub fn new(gateway: EmbeddingGateway) -> Self {
        Self {
            gateway: Arc::new(gateway),
            api_key_configured: true,
        }
    }
}
