use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::post};
use tracing::info;

use kg_embed_core::error::EmbedError;
use kg_embed_core::provider::TextEncoder;
use kg_embed_core::types::EmbeddingVector;

use crate::error::AppError;
use crate::state::AppState;
use crate::types::{BatchEmbedRequest, BatchEmbedResponse, EmbedRequest, EmbedResponse, with_prefix};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/embed", post(embed))
        .route("/embed/batch", post(embed_batch))
}

/// Run the encoder on a blocking worker so inference never stalls the runtime.
async fn encode(
    encoder: Arc<dyn TextEncoder>,
    texts: Vec<String>,
) -> Result<Vec<EmbeddingVector>, AppError> {
    let vectors = tokio::task::spawn_blocking(move || encoder.encode(&texts))
        .await
        .map_err(|e| EmbedError::Other(format!("encoder task failed: {e}")))??;
    Ok(vectors)
}

async fn embed(
    State(state): State<AppState>,
    Json(req): Json<EmbedRequest>,
) -> Result<Json<EmbedResponse>, AppError> {
    let text = with_prefix(req.prefix, req.text);
    let vector = encode(state.encoder.clone(), vec![text])
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| EmbedError::Other("encoder returned no embedding".into()))?;

    let dimension = vector.dimension();
    Ok(Json(EmbedResponse {
        embedding: vector.into_inner(),
        dimension,
    }))
}

async fn embed_batch(
    State(state): State<AppState>,
    Json(req): Json<BatchEmbedRequest>,
) -> Result<Json<BatchEmbedResponse>, AppError> {
    if req.texts.is_empty() {
        return Err(AppError::BadRequest("texts must not be empty".into()));
    }

    let expected = req.texts.len();
    let texts: Vec<String> = req
        .texts
        .into_iter()
        .map(|t| with_prefix(req.prefix, t))
        .collect();
    let vectors = encode(state.encoder.clone(), texts).await?;
    if vectors.len() != expected {
        return Err(EmbedError::Other(format!(
            "encoder returned {} embeddings for {expected} texts",
            vectors.len()
        ))
        .into());
    }

    let dimension = vectors
        .first()
        .map(|v| v.dimension())
        .unwrap_or_else(|| state.encoder.dimension());
    let count = vectors.len();
    info!(count, dimension, "batch embedded");

    Ok(Json(BatchEmbedResponse {
        embeddings: vectors.into_iter().map(|v| v.into_inner()).collect(),
        dimension,
        count,
    }))
}
