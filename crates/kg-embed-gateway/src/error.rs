use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

use kg_embed_core::error::{EmbedError, ModelError};

const RATE_LIMIT_DETAIL: &str = "Rate limit exceeded. Please retry later.";

/// Application error type that maps to HTTP responses.
///
/// Each embedding endpoint has its own mapping: `/embed` distinguishes
/// quota, credential and input errors, `/embed/batch` only singles out
/// quota errors, and `/embed/compare` reports every failure as a 500.
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    /// A required parameter is missing or malformed (422).
    InvalidParams(String),
    Embed(EmbedError),
    Batch(EmbedError),
    Compare(EmbedError),
}

impl From<EmbedError> for AppError {
    fn from(err: EmbedError) -> Self {
        AppError::Embed(err)
    }
}

impl AppError {
    fn status_and_detail(&self) -> (StatusCode, String) {
        match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::InvalidParams(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            AppError::Embed(EmbedError::Model(ModelError::RateLimited { .. }))
            | AppError::Batch(EmbedError::Model(ModelError::RateLimited { .. })) => {
                (StatusCode::TOO_MANY_REQUESTS, RATE_LIMIT_DETAIL.into())
            }
            AppError::Embed(EmbedError::Model(ModelError::Auth(_))) => {
                (StatusCode::UNAUTHORIZED, "Invalid API key".into())
            }
            AppError::Embed(EmbedError::Model(ModelError::InvalidRequest(msg))) => {
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            AppError::Embed(err) | AppError::Batch(err) | AppError::Compare(err) => {
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = self.status_and_detail();
        match &self {
            AppError::Embed(err) => error!(%status, error = %err, "embedding request failed"),
            AppError::Batch(err) => error!(%status, error = %err, "Batch processing error"),
            AppError::Compare(err) => error!(%status, error = %err, "Comparison error"),
            AppError::BadRequest(msg) | AppError::InvalidParams(msg) => {
                error!(%status, "rejected request: {msg}")
            }
        }

        let body = json!({ "detail": detail });
        (status, axum::Json(body)).into_response()
    }
}
