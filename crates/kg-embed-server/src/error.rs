use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

use kg_embed_core::error::EmbedError;

/// Application error type that maps to HTTP responses.
///
/// Every model failure is a 500; only request validation yields a 400.
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Embed(EmbedError),
}

impl From<EmbedError> for AppError {
    fn from(err: EmbedError) -> Self {
        AppError::Embed(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Embed(err) => {
                error!(error = %err, "Embedding generation failed");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        };

        let body = json!({ "detail": detail });
        (status, axum::Json(body)).into_response()
    }
}
