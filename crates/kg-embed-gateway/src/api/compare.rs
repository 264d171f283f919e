use axum::body::Bytes;
use axum::{Json, Router, extract::Query, extract::State, routing::post};

use kg_embed_core::similarity::preview;

use crate::error::AppError;
use crate::state::AppState;
use crate::types::{CompareParams, CompareResponse};

const PREVIEW_CHARS: usize = 100;

pub fn routes() -> Router<AppState> {
    Router::new().route("/embed/compare", post(compare))
}

/// Accepts `text1` / `text2` as query parameters, a JSON body, or a mix;
/// query parameters take precedence.
async fn compare(
    State(state): State<AppState>,
    Query(query): Query<CompareParams>,
    body: Bytes,
) -> Result<Json<CompareResponse>, AppError> {
    let from_body = if body.iter().all(u8::is_ascii_whitespace) {
        CompareParams::default()
    } else {
        serde_json::from_slice::<CompareParams>(&body)
            .map_err(|e| AppError::BadRequest(format!("invalid JSON body: {e}")))?
    };

    let params = query.or(from_body);
    let text1 = params
        .text1
        .ok_or_else(|| AppError::InvalidParams("missing required parameter: text1".into()))?;
    let text2 = params
        .text2
        .ok_or_else(|| AppError::InvalidParams("missing required parameter: text2".into()))?;

    let comparison = state
        .gateway
        .compare(&text1, &text2)
        .await
        .map_err(AppError::Compare)?;

    Ok(Json(CompareResponse {
        text1_preview: preview(&text1, PREVIEW_CHARS),
        text2_preview: preview(&text2, PREVIEW_CHARS),
        similarity: comparison.similarity,
        interpretation: comparison.band,
    }))
}
