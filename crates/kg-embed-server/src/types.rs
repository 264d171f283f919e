use serde::{Deserialize, Deserializer, Serialize, de};

/// E5 input role marker, prepended as `"{prefix}: "`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Prefix {
    Query,
    Passage,
}

impl Prefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Passage => "passage",
        }
    }

    pub fn apply(&self, text: &str) -> String {
        format!("{}: {}", self.as_str(), text)
    }
}

/// `null`, a missing field and `""` all mean "no prefix".
fn optional_prefix<'de, D>(deserializer: D) -> Result<Option<Prefix>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some("query") => Ok(Some(Prefix::Query)),
        Some("passage") => Ok(Some(Prefix::Passage)),
        Some(other) => Err(de::Error::unknown_variant(other, &["query", "passage"])),
    }
}

/// Apply an optional prefix to `text`.
pub fn with_prefix(prefix: Option<Prefix>, text: String) -> String {
    match prefix {
        Some(p) => p.apply(&text),
        None => text,
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbedRequest {
    pub text: String,
    #[serde(default, deserialize_with = "optional_prefix")]
    pub prefix: Option<Prefix>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedResponse {
    pub embedding: Vec<f32>,
    pub dimension: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BatchEmbedRequest {
    pub texts: Vec<String>,
    #[serde(default, deserialize_with = "optional_prefix")]
    pub prefix: Option<Prefix>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchEmbedResponse {
    pub embeddings: Vec<Vec<f32>>,
    pub dimension: usize,
    pub count: usize,
}
