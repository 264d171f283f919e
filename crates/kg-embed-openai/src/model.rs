use serde::{Deserialize, Serialize};

/// OpenAI embedding model variants.
///
/// Unknown names are kept as `Custom` and forwarded verbatim; the provider
/// decides whether they exist.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OpenAiEmbeddingModel {
    #[default]
    Ada002,
    TextEmbedding3Small,
    TextEmbedding3Large,
    Custom(String),
}

impl OpenAiEmbeddingModel {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Ada002 => "text-embedding-ada-002",
            Self::TextEmbedding3Small => "text-embedding-3-small",
            Self::TextEmbedding3Large => "text-embedding-3-large",
            Self::Custom(s) => s,
        }
    }

    /// Expected output dimension. `Custom` models are assumed to match ada-002.
    pub fn dimension(&self) -> usize {
        match self {
            Self::Ada002 => 1536,
            Self::TextEmbedding3Small => 1536,
            Self::TextEmbedding3Large => 3072,
            Self::Custom(_) => 1536,
        }
    }
}

impl From<String> for OpenAiEmbeddingModel {
    fn from(name: String) -> Self {
        match name.as_str() {
            "text-embedding-ada-002" => Self::Ada002,
            "text-embedding-3-small" => Self::TextEmbedding3Small,
            "text-embedding-3-large" => Self::TextEmbedding3Large,
            _ => Self::Custom(name),
        }
    }
}

impl From<OpenAiEmbeddingModel> for String {
    fn from(model: OpenAiEmbeddingModel) -> Self {
        match model {
            OpenAiEmbeddingModel::Custom(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for OpenAiEmbeddingModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
