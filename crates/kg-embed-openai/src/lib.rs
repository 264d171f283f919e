pub mod client;
pub mod model;

pub use client::OpenAiEmbedding;
pub use model::OpenAiEmbeddingModel;
