use serde::{Deserialize, Serialize};

use kg_embed_core::similarity::SimilarityBand;
use kg_embed_openai::OpenAiEmbeddingModel;

#[derive(Debug, Clone, Deserialize)]
pub struct EmbedRequest {
    pub text: String,
    #[serde(default)]
    pub model: OpenAiEmbeddingModel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedResponse {
    pub embedding: Vec<f32>,
    pub dimension: usize,
    pub model: OpenAiEmbeddingModel,
    pub tokens: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BatchEmbedRequest {
    pub texts: Vec<String>,
    #[serde(default)]
    pub model: OpenAiEmbeddingModel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchEmbedResponse {
    pub embeddings: Vec<Vec<f32>>,
    pub dimension: usize,
    pub model: OpenAiEmbeddingModel,
    pub total_tokens: u32,
    pub count: usize,
}

/// `text1` / `text2` for `/embed/compare`, from the query string or a JSON body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompareParams {
    pub text1: Option<String>,
    pub text2: Option<String>,
}

impl CompareParams {
    /// Field-wise merge; values already present in `self` win.
    pub fn or(self, fallback: CompareParams) -> CompareParams {
        CompareParams {
            text1: self.text1.or(fallback.text1),
            text2: self.text2.or(fallback.text2),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareResponse {
    pub text1_preview: String,
    pub text2_preview: String,
    pub similarity: f32,
    pub interpretation: SimilarityBand,
}
