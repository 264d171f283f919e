use axum::{Json, Router, extract::State, routing::post};

use crate::error::AppError;
use crate::state::AppState;
use crate::types::{BatchEmbedRequest, BatchEmbedResponse, EmbedRequest, EmbedResponse};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/embed", post(embed))
        .route("/embed/batch", post(embed_batch))
}

async fn embed(
    State(state): State<AppState>,
    Json(req): Json<EmbedRequest>,
) -> Result<Json<EmbedResponse>, AppError> {
    let out = state.gateway.embed(&req.text, &req.model).await?;
    let dimension = out.vector.dimension();

    Ok(Json(EmbedResponse {
        embedding: out.vector.into_inner(),
        dimension,
        model: req.model,
        tokens: out.total_tokens,
    }))
}

async fn embed_batch(
    State(state): State<AppState>,
    Json(req): Json<BatchEmbedRequest>,
) -> Result<Json<BatchEmbedResponse>, AppError> {
    if req.texts.is_empty() {
        return Err(AppError::BadRequest("texts must not be empty".into()));
    }

    let batch = state
        .gateway
        .embed_batch(&req.texts, &req.model)
        .await
        .map_err(AppError::Batch)?;
    let dimension = batch
        .vectors
        .first()
        .map(|v| v.dimension())
        .unwrap_or_else(|| req.model.dimension());
    let count = batch.vectors.len();

    Ok(Json(BatchEmbedResponse {
        embeddings: batch.vectors.into_iter().map(|v| v.into_inner()).collect(),
        dimension,
        model: req.model,
        total_tokens: batch.total_tokens,
        count,
    }))
}
