use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use kg_embed_core::config::must_env;
use kg_embed_core::error::{ConfigError, EmbedError, ModelError, Result};
use kg_embed_core::provider::EmbeddingProvider;
use kg_embed_core::types::{EmbeddingVector, ProviderEmbedding};

/// Environment variable holding the gateway's OpenAI credential.
pub const API_KEY_VAR: &str = "OPENAI_API_KEY_ADA_002";

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// OpenAI `/v1/embeddings` provider.
///
/// One `create` call is one HTTP request; nothing is retried.
pub struct OpenAiEmbedding {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiEmbedding {
    /// Create a provider using the key in `OPENAI_API_KEY_ADA_002`.
    pub fn new() -> Result<Self> {
        let api_key = must_env(API_KEY_VAR)?;
        Self::with_api_key(api_key)
    }

    /// Create a provider with an explicit key. An empty key is rejected.
    pub fn with_api_key(api_key: String) -> Result<Self> {
        Self::with_api_key_and_timeout(api_key, DEFAULT_TIMEOUT)
    }

    pub fn with_api_key_and_timeout(api_key: String, timeout: Duration) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(ConfigError::MissingVar(API_KEY_VAR).into());
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EmbedError::Other(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.into(),
        })
    }

    /// Set a custom base URL (for testing or proxied endpoints).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn call_api(&self, input: &str, model: &str) -> Result<ProviderEmbedding> {
        let started = Instant::now();
        let url = format!("{}/v1/embeddings", self.base_url);
        let request = EmbeddingRequest { input, model };

        debug!(model, input_len = input.len(), "POST {url}");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ModelError::ApiRequest(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok());
            let body = response.text().await.unwrap_or_default();
            let err = error_for_status(status, retry_after, &body);
            error!(
                %status,
                model,
                latency_ms = started.elapsed().as_millis() as u64,
                error = %err,
                "OpenAI /v1/embeddings returned non-success status"
            );
            return Err(err.into());
        }

        let body: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| ModelError::InvalidResponse(e.to_string()))?;

        let embedding = into_provider_embedding(body)?;
        info!(
            model,
            dimension = embedding.vector.dimension(),
            tokens = embedding.total_tokens,
            latency_ms = started.elapsed().as_millis() as u64,
            "embedding created"
        );
        Ok(embedding)
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbedding {
    async fn create(&self, input: &str, model: &str) -> Result<ProviderEmbedding> {
        self.call_api(input, model).await
    }

    fn name(&self) -> &str {
        "openai"
    }
}

/// Map a non-success OpenAI status to the provider error taxonomy.
pub(crate) fn error_for_status(
    status: StatusCode,
    retry_after_secs: Option<u64>,
    body: &str,
) -> ModelError {
    let message = provider_message(body);
    match status {
        StatusCode::UNAUTHORIZED => ModelError::Auth(
            message.unwrap_or_else(|| "Invalid OpenAI API key".into()),
        ),
        StatusCode::TOO_MANY_REQUESTS => ModelError::RateLimited { retry_after_secs },
        StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND | StatusCode::UNPROCESSABLE_ENTITY => {
            ModelError::InvalidRequest(message.unwrap_or_else(|| format!("OpenAI rejected request ({status})")))
        }
        _ => ModelError::ApiRequest(format!(
            "OpenAI API error {status}: {}",
            message.unwrap_or_else(|| body.trim().to_string())
        )),
    }
}

/// Extract `error.message` from an OpenAI error envelope.
fn provider_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .map(|e| e.error.message)
        .filter(|m| !m.trim().is_empty())
}

fn into_provider_embedding(body: EmbeddingResponse) -> Result<ProviderEmbedding> {
    let data = body
        .data
        .into_iter()
        .min_by_key(|d| d.index)
        .ok_or_else(|| ModelError::InvalidResponse("empty `data` in embeddings response".into()))?;
    Ok(ProviderEmbedding {
        vector: EmbeddingVector::new(data.embedding),
        total_tokens: body.usage.map(|u| u.total_tokens).unwrap_or(0),
    })
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    input: &'a str,
    model: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    #[serde(default)]
    index: usize,
}

#[derive(Deserialize)]
struct Usage {
    total_tokens: u32,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}
