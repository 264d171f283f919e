use std::sync::Arc;

use tracing::info;

use kg_embed_core::error::Result;
use kg_embed_core::provider::EmbeddingProvider;
use kg_embed_core::rate_limit::RateLimiter;
use kg_embed_core::similarity::Comparison;
use kg_embed_core::types::{EmbeddingVector, ProviderEmbedding};
use kg_embed_openai::OpenAiEmbeddingModel;

/// Embeddings of a whole batch, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchEmbeddings {
    pub vectors: Vec<EmbeddingVector>,
    pub total_tokens: u32,
}

/// Paces every outbound provider call through one shared limiter.
pub struct EmbeddingGateway {
    provider: Arc<dyn EmbeddingProvider>,
    limiter: RateLimiter,
}

impl EmbeddingGateway {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, limiter: RateLimiter) -> Self {
        Self { provider, limiter }
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    async fn paced_create(&self, text: &str, model: &OpenAiEmbeddingModel) -> Result<ProviderEmbedding> {
        self.limiter.acquire().await;
        self.provider.create(text, model.as_str()).await
    }

    pub async fn embed(&self, text: &str, model: &OpenAiEmbeddingModel) -> Result<ProviderEmbedding> {
        info!("Generating embedding for text of length {}", text.chars().count());
        let out = self.paced_create(text, model).await?;
        info!(
            "Generated embedding: {} dimensions, {} tokens",
            out.vector.dimension(),
            out.total_tokens
        );
        Ok(out)
    }

    /// Embed `texts` one call at a time. The first failure aborts the batch
    /// and discards everything embedded so far.
    pub async fn embed_batch(
        &self,
        texts: &[String],
        model: &OpenAiEmbeddingModel,
    ) -> Result<BatchEmbeddings> {
        let total = texts.len();
        let mut vectors = Vec::with_capacity(total);
        let mut total_tokens = 0u32;

        for (i, text) in texts.iter().enumerate() {
            self.limiter.acquire().await;
            info!("Processing batch item {}/{}", i + 1, total);
            let out = self.provider.create(text, model.as_str()).await?;
            total_tokens = total_tokens.saturating_add(out.total_tokens);
            vectors.push(out.vector);
        }

        info!(
            "Batch complete: {} embeddings, {} total tokens",
            vectors.len(),
            total_tokens
        );
        Ok(BatchEmbeddings {
            vectors,
            total_tokens,
        })
    }

    /// Embed both texts with the default model, sequentially, and score them.
    pub async fn compare(&self, text1: &str, text2: &str) -> Result<Comparison> {
        let model = OpenAiEmbeddingModel::default();
        let first = self.paced_create(text1, &model).await?;
        let second = self.paced_create(text2, &model).await?;
        let comparison = Comparison::between(&first.vector, &second.vector);
        info!(
            similarity = comparison.similarity,
            interpretation = %comparison.band,
            "comparison complete"
        );
        Ok(comparison)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::time::Instant;

    use kg_embed_core::error::{EmbedError, ModelError};
    use kg_embed_core::similarity::SimilarityBand;

    use super::*;

    /// Records every call; fails on texts listed in `fail_on`.
    struct RecordingProvider {
        calls: Mutex<Vec<(String, String, Instant)>>,
        fail_on: Vec<&'static str>,
    }

    impl RecordingProvider {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_on: Vec::new(),
            }
        }

        fn failing_on(text: &'static str) -> Self {
            Self {
                fail_on: vec![text],
                ..Self::new()
            }
        }

        fn calls(&self) -> Vec<(String, String, Instant)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl EmbeddingProvider for RecordingProvider {
        async fn create(&self, input: &str, model: &str) -> Result<ProviderEmbedding> {
            self.calls
                .lock()
                .unwrap()
                .push((input.to_string(), model.to_string(), Instant::now()));
            if self.fail_on.contains(&input) {
                return Err(ModelError::RateLimited {
                    retry_after_secs: None,
                }
                .into());
            }
            Ok(ProviderEmbedding {
                vector: EmbeddingVector::new(vec![input.len() as f32, 1.0, 0.5]),
                total_tokens: input.split_whitespace().count() as u32,
            })
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    fn gateway(provider: Arc<RecordingProvider>, rate: u32) -> EmbeddingGateway {
        EmbeddingGateway::new(provider, RateLimiter::per_second(rate))
    }

    #[tokio::test(start_paused = true)]
    async fn embed_passes_model_through() {
        let provider = Arc::new(RecordingProvider::new());
        let gw = gateway(provider.clone(), 3);

        let out = gw
            .embed("two words", &OpenAiEmbeddingModel::TextEmbedding3Large)
            .await
            .unwrap();
        assert_eq!(out.total_tokens, 2);

        let calls = provider.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, "text-embedding-3-large");
    }

    #[tokio::test(start_paused = true)]
    async fn batch_preserves_order_and_sums_tokens() {
        let provider = Arc::new(RecordingProvider::new());
        let gw = gateway(provider.clone(), 3);
        let texts: Vec<String> = vec!["a".into(), "bb cc".into(), "ddd".into()];

        let out = gw
            .embed_batch(&texts, &OpenAiEmbeddingModel::Ada002)
            .await
            .unwrap();

        assert_eq!(out.vectors.len(), 3);
        assert_eq!(out.vectors[0].as_slice()[0], 1.0);
        assert_eq!(out.vectors[1].as_slice()[0], 5.0);
        assert_eq!(out.vectors[2].as_slice()[0], 3.0);
        assert_eq!(out.total_tokens, 4);

        let inputs: Vec<String> = provider.calls().into_iter().map(|c| c.0).collect();
        assert_eq!(inputs, texts);
    }

    #[tokio::test(start_paused = true)]
    async fn batch_calls_are_spaced_by_interval() {
        let provider = Arc::new(RecordingProvider::new());
        let gw = gateway(provider.clone(), 3);
        let texts: Vec<String> = (0..4).map(|i| format!("text {i}")).collect();

        let start = Instant::now();
        gw.embed_batch(&texts, &OpenAiEmbeddingModel::Ada002)
            .await
            .unwrap();
        assert!(start.elapsed() >= Duration::from_secs_f64(1.0 / 3.0) * 3);

        let calls = provider.calls();
        for pair in calls.windows(2) {
            assert!(pair[1].2 - pair[0].2 >= gw.limiter().interval());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn batch_failure_discards_partial_results() {
        let provider = Arc::new(RecordingProvider::failing_on("boom"));
        let gw = gateway(provider.clone(), 3);
        let texts: Vec<String> = vec!["ok".into(), "boom".into(), "never".into()];

        let err = gw
            .embed_batch(&texts, &OpenAiEmbeddingModel::Ada002)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EmbedError::Model(ModelError::RateLimited { .. })
        ));
        // no retry, and nothing after the failing item
        assert_eq!(provider.calls().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn compare_same_text_is_very_similar() {
        let provider = Arc::new(RecordingProvider::new());
        let gw = gateway(provider.clone(), 3);

        let cmp = gw.compare("same text", "same text").await.unwrap();
        assert!((cmp.similarity - 1.0).abs() < 1e-6);
        assert_eq!(cmp.band, SimilarityBand::VerySimilar);

        let calls = provider.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls.iter().all(|c| c.1 == "text-embedding-ada-002"));
        assert!(calls[1].2 - calls[0].2 >= gw.limiter().interval());
    }
}
