//! In-process router tests against a deterministic mock encoder.

use std::sync::Arc;
use std::sync::Mutex;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use kg_embed_core::error::{ModelError, Result};
use kg_embed_core::provider::TextEncoder;
use kg_embed_core::types::EmbeddingVector;
use kg_embed_server::state::AppState;

const DIM: usize = 1024;

/// Hashes each input into a unit-length 1024-dim vector and records what it saw.
struct HashingEncoder {
    seen: Mutex<Vec<Vec<String>>>,
    fail: bool,
}

impl HashingEncoder {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            seen: Mutex::new(Vec::new()),
            fail: false,
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            seen: Mutex::new(Vec::new()),
            fail: true,
        })
    }

    fn seen(&self) -> Vec<Vec<String>> {
        self.seen.lock().unwrap().clone()
    }
}

fn hash_vector(text: &str) -> Vec<f32> {
    let mut v = vec![0.0f32; DIM];
    for (i, b) in text.bytes().enumerate() {
        v[(usize::from(b) * 31 + i * 7) % DIM] += 1.0;
    }
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        v.iter_mut().for_each(|x| *x /= norm);
    }
    v
}

impl TextEncoder for HashingEncoder {
    fn encode(&self, texts: &[String]) -> Result<Vec<EmbeddingVector>> {
        self.seen.lock().unwrap().push(texts.to_vec());
        if self.fail {
            return Err(ModelError::Inference("onnx runtime exploded".into()).into());
        }
        Ok(texts.iter().map(|t| EmbeddingVector::new(hash_vector(t))).collect())
    }

    fn dimension(&self) -> usize {
        DIM
    }

    fn model_name(&self) -> &str {
        "intfloat/e5-large-v2"
    }
}

fn app(encoder: Arc<HashingEncoder>) -> axum::Router {
    kg_embed_server::app_router(AppState::new(encoder))
}

async fn send(app: axum::Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&json).unwrap())
        }
        None => Body::empty(),
    };
    let resp = app.oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

fn as_vec(value: &Value) -> Vec<f32> {
    serde_json::from_value(value.clone()).unwrap()
}

#[tokio::test]
async fn health_reports_model() {
    let (status, json) = send(app(HashingEncoder::new()), "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!({"status": "healthy", "model": "intfloat/e5-large-v2", "dimension": 1024})
    );
}

#[tokio::test]
async fn root_lists_prefix_usage() {
    let (status, json) = send(app(HashingEncoder::new()), "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["service"], "KG4EPIC Embeddings");
    assert_eq!(json["model"], "intfloat/e5-large-v2");
    assert!(json["usage"]["query"].is_string());
    assert!(json["usage"]["passage"].is_string());
}

#[tokio::test]
async fn embed_returns_fixed_dimension() {
    let (status, json) = send(
        app(HashingEncoder::new()),
        "POST",
        "/embed",
        Some(json!({"text": "feature: search by tag"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["dimension"], 1024);
    assert_eq!(json["embedding"].as_array().unwrap().len(), 1024);
}

#[tokio::test]
async fn prefix_is_prepended() {
    let encoder = HashingEncoder::new();
    let (status, _) = send(
        app(encoder.clone()),
        "POST",
        "/embed",
        Some(json!({"text": "login page", "prefix": "query"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(encoder.seen(), vec![vec!["query: login page".to_string()]]);
}

#[tokio::test]
async fn query_and_passage_prefixes_differ() {
    let encoder = HashingEncoder::new();
    let (_, query) = send(
        app(encoder.clone()),
        "POST",
        "/embed",
        Some(json!({"text": "same text", "prefix": "query"})),
    )
    .await;
    let (_, passage) = send(
        app(encoder),
        "POST",
        "/embed",
        Some(json!({"text": "same text", "prefix": "passage"})),
    )
    .await;
    assert_ne!(as_vec(&query["embedding"]), as_vec(&passage["embedding"]));
}

#[tokio::test]
async fn unknown_prefix_is_422() {
    let encoder = HashingEncoder::new();
    let (status, _) = send(
        app(encoder.clone()),
        "POST",
        "/embed",
        Some(json!({"text": "x", "prefix": "document"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(encoder.seen().is_empty());
}

#[tokio::test]
async fn batch_is_single_call_in_order() {
    let encoder = HashingEncoder::new();
    let texts = ["epic one", "feature two", "story three"];
    let (status, json) = send(
        app(encoder.clone()),
        "POST",
        "/embed/batch",
        Some(json!({"texts": texts, "prefix": "passage"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 3);
    assert_eq!(json["dimension"], 1024);

    let seen = encoder.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(
        seen[0],
        vec!["passage: epic one", "passage: feature two", "passage: story three"]
    );

    let embeddings = json["embeddings"].as_array().unwrap();
    for (embedding, text) in embeddings.iter().zip(texts) {
        assert_eq!(as_vec(embedding), hash_vector(&format!("passage: {text}")));
    }
}

#[tokio::test]
async fn empty_batch_is_400() {
    let encoder = HashingEncoder::new();
    let (status, json) = send(
        app(encoder.clone()),
        "POST",
        "/embed/batch",
        Some(json!({"texts": []})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["detail"], "texts must not be empty");
    assert!(encoder.seen().is_empty());
}

#[tokio::test]
async fn model_failure_is_500_with_detail() {
    let (status, json) = send(
        app(HashingEncoder::failing()),
        "POST",
        "/embed",
        Some(json!({"text": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json["detail"].as_str().unwrap().contains("onnx runtime exploded"));
}

#[tokio::test]
async fn batch_model_failure_is_500() {
    let (status, _) = send(
        app(HashingEncoder::failing()),
        "POST",
        "/embed/batch",
        Some(json!({"texts": ["a", "b"]})),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn empty_prefix_is_treated_as_none() {
    let encoder = HashingEncoder::new();
    let (status, _) = send(
        app(encoder.clone()),
        "POST",
        "/embed",
        Some(json!({"text": "login page", "prefix": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        app(encoder.clone()),
        "POST",
        "/embed/batch",
        Some(json!({"texts": ["a", "b"], "prefix": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(
        encoder.seen(),
        vec![
            vec!["login page".to_string()],
            vec!["a".to_string(), "b".to_string()]
        ]
    );
}
