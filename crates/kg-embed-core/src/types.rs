use serde::{Deserialize, Serialize};

/// A vector embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingVector(pub Vec<f32>);

impl EmbeddingVector {
    pub fn new(data: Vec<f32>) -> Self {
        Self(data)
    }

    pub fn dimension(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<f32> {
        self.0
    }

    /// Cosine similarity with another vector.
    ///
    /// A zero-norm operand yields `0.0` instead of NaN.
    pub fn cosine_similarity(&self, other: &EmbeddingVector) -> f32 {
        let dot: f32 = self.0.iter().zip(other.0.iter()).map(|(a, b)| a * b).sum();
        let norm_a: f32 = self.0.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = other.0.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }
        dot / (norm_a * norm_b)
    }
}

impl From<Vec<f32>> for EmbeddingVector {
    fn from(data: Vec<f32>) -> Self {
        Self(data)
    }
}

/// Result of a single outbound provider call.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderEmbedding {
    pub vector: EmbeddingVector,
    /// Tokens billed by the provider for this input.
    pub total_tokens: u32,
}
