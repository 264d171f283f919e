pub mod config;
pub mod error;
pub mod provider;
pub mod rate_limit;
pub mod similarity;
pub mod types;

pub mod prelude {
    pub use crate::error::{ConfigError, EmbedError, ModelError, Result};
    pub use crate::provider::{EmbeddingProvider, TextEncoder};
    pub use crate::rate_limit::RateLimiter;
    pub use crate::similarity::{Comparison, SimilarityBand, preview};
    pub use crate::types::{EmbeddingVector, ProviderEmbedding};
}
