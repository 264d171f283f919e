use axum::{Json, Router, extract::State, routing::get};
use serde_json::{Value, json};

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
}

async fn root(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "service": "KG4EPIC Embeddings",
        "endpoints": {
            "/health": "Service health check",
            "/embed": "Generate single embedding",
            "/embed/batch": "Generate batch embeddings"
        },
        "model": state.encoder.model_name(),
        "dimension": state.encoder.dimension(),
        "usage": {
            "query": "Use prefix='query' for search queries",
            "passage": "Use prefix='passage' for indexed content"
        }
    }))
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "model": state.encoder.model_name(),
        "dimension": state.encoder.dimension()
    }))
}
