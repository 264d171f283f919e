use serde::{Deserialize, Serialize};

use crate::types::EmbeddingVector;

/// Coarse interpretation of a cosine similarity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimilarityBand {
    #[serde(rename = "Very similar")]
    VerySimilar,
    #[serde(rename = "Similar")]
    Similar,
    #[serde(rename = "Somewhat related")]
    SomewhatRelated,
    #[serde(rename = "Different")]
    Different,
}

impl SimilarityBand {
    /// Thresholds are strict: a score of exactly 0.9 is only `Similar`.
    pub fn classify(score: f32) -> Self {
        if score > 0.9 {
            Self::VerySimilar
        } else if score > 0.7 {
            Self::Similar
        } else if score > 0.5 {
            Self::SomewhatRelated
        } else {
            Self::Different
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::VerySimilar => "Very similar",
            Self::Similar => "Similar",
            Self::SomewhatRelated => "Somewhat related",
            Self::Different => "Different",
        }
    }
}

impl std::fmt::Display for SimilarityBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Scored comparison of two embeddings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Comparison {
    pub similarity: f32,
    pub band: SimilarityBand,
}

impl Comparison {
    pub fn between(a: &EmbeddingVector, b: &EmbeddingVector) -> Self {
        let similarity = a.cosine_similarity(b);
        Self {
            similarity,
            band: SimilarityBand::classify(similarity),
        }
    }
}

/// First `max_chars` characters of `text`, never splitting a code point.
pub fn preview(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
