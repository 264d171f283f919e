use async_trait::async_trait;

use crate::error::Result;
use crate::types::{EmbeddingVector, ProviderEmbedding};

/// A remote embedding API that embeds one input per call.
///
/// Implementations perform exactly one outbound request per `create` and
/// never retry; pacing is the caller's concern.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed `input` with the named provider model.
    async fn create(&self, input: &str, model: &str) -> Result<ProviderEmbedding>;

    /// Provider name used in logs (e.g. `"openai"`).
    fn name(&self) -> &str;
}

/// An in-process embedding model.
///
/// `encode` is synchronous and may be CPU heavy; async callers should run it
/// on a blocking worker.
pub trait TextEncoder: Send + Sync {
    /// Encode every text, returning one vector per input in input order.
    fn encode(&self, texts: &[String]) -> Result<Vec<EmbeddingVector>>;

    /// Output dimensionality, fixed for the lifetime of the encoder.
    fn dimension(&self) -> usize;

    fn model_name(&self) -> &str;
}
