use axum::{Json, Router, extract::State, routing::get};
use serde_json::{Value, json};

use kg_embed_openai::OpenAiEmbeddingModel;

use crate::state::AppState;

/// Provider-side input cap for the ada-002 model.
const MAX_TOKENS: u32 = 8191;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
}

async fn root(State(state): State<AppState>) -> Json<Value> {
    let model = OpenAiEmbeddingModel::default();
    Json(json!({
        "service": "KG4EPIC Ada-002 Embeddings",
        "model": model.as_str(),
        "dimensions": model.dimension(),
        "endpoints": {
            "/health": "Service health check",
            "/embed": "Generate single embedding",
            "/embed/batch": "Generate batch embeddings",
            "/embed/compare": "Compare two texts by cosine similarity"
        },
        "rate_limit": state.gateway.limiter().describe(),
        "max_tokens": MAX_TOKENS
    }))
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    let model = OpenAiEmbeddingModel::default();
    Json(json!({
        "status": "healthy",
        "model": model.as_str(),
        "dimension": model.dimension(),
        "api_key_configured": state.api_key_configured,
        "rate_limit": state.gateway.limiter().describe()
    }))
}
