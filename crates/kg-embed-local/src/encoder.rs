//! E5 sentence encoder on ONNX Runtime.
//!
//! Pipeline: tokenize (truncate to `max_length`, pad to the batch's longest
//! sequence), run the exported transformer graph, mean-pool the last hidden
//! state under the attention mask, L2-normalize each row.

use std::sync::Mutex;

use ndarray::{Array2, Ix3};
use ort::session::Session;
use ort::session::builder::GraphOptimizationLevel;
use ort::value::Value;
use tokenizers::{PaddingParams, Tokenizer, TruncationParams};
use tracing::{debug, info};

use kg_embed_core::error::{EmbedError, ModelError, Result};
use kg_embed_core::provider::TextEncoder;
use kg_embed_core::types::EmbeddingVector;

use crate::pooling::{l2_normalize, mean_pool};
use crate::source::{ModelFiles, ModelSource};

/// Output dimension of `intfloat/e5-large-v2`.
pub const E5_LARGE_DIMENSION: usize = 1024;

fn load_err(e: impl std::fmt::Display) -> EmbedError {
    ModelError::Load(e.to_string()).into()
}

fn inference_err(e: impl std::fmt::Display) -> EmbedError {
    ModelError::Inference(e.to_string()).into()
}

pub struct E5Encoder {
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    model_name: String,
    dimension: usize,
}

impl std::fmt::Debug for E5Encoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("E5Encoder")
            .field("model_name", &self.model_name)
            .field("dimension", &self.dimension)
            .finish_non_exhaustive()
    }
}

impl E5Encoder {
    /// Resolve `source` and load it on a blocking worker.
    pub async fn from_source(source: &ModelSource, max_length: usize) -> Result<Self> {
        let files = source.resolve().await?;
        let model_name = source.repo_id.clone();
        tokio::task::spawn_blocking(move || {
            Self::load(&files, model_name, max_length, E5_LARGE_DIMENSION)
        })
        .await
        .map_err(|e| load_err(format!("model loader task failed: {e}")))?
    }

    /// Load the graph and tokenizer, then verify the output dimension with
    /// a probe inference.
    pub fn load(
        files: &ModelFiles,
        model_name: String,
        max_length: usize,
        expected_dimension: usize,
    ) -> Result<Self> {
        info!(model = %model_name, path = %files.model.display(), "loading ONNX model");

        let session = Session::builder()
            .map_err(load_err)?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(load_err)?
            .with_intra_threads(4)
            .map_err(load_err)?
            .commit_from_file(&files.model)
            .map_err(load_err)?;

        let mut tokenizer = Tokenizer::from_file(&files.tokenizer).map_err(load_err)?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length,
                ..Default::default()
            }))
            .map_err(load_err)?;
        tokenizer.with_padding(Some(PaddingParams::default()));

        let encoder = Self {
            session: Mutex::new(session),
            tokenizer,
            model_name,
            dimension: expected_dimension,
        };

        let probe = encoder.run(&["validation test".to_string()])?;
        let got = probe.first().map(|v| v.len()).unwrap_or(0);
        if got != expected_dimension {
            return Err(load_err(format!(
                "model outputs {got} dimensions, expected {expected_dimension}"
            )));
        }

        info!(model = %encoder.model_name, dimension = got, "ONNX model loaded");
        Ok(encoder)
    }

    fn run(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(inference_err)?;

        let batch = encodings.len();
        let seq_len = encodings.iter().map(|e| e.get_ids().len()).max().unwrap_or(0);

        let mut ids = Vec::with_capacity(batch * seq_len);
        let mut mask = Vec::with_capacity(batch * seq_len);
        for encoding in &encodings {
            let row_ids = encoding.get_ids();
            let row_mask = encoding.get_attention_mask();
            ids.extend(row_ids.iter().map(|&id| i64::from(id)));
            mask.extend(row_mask.iter().map(|&m| i64::from(m)));
            // padding is normally applied by the tokenizer already
            let pad = seq_len - row_ids.len();
            ids.extend(std::iter::repeat_n(0i64, pad));
            mask.extend(std::iter::repeat_n(0i64, pad));
        }

        let input_ids = Array2::from_shape_vec((batch, seq_len), ids).map_err(inference_err)?;
        let attention_mask =
            Array2::from_shape_vec((batch, seq_len), mask).map_err(inference_err)?;
        let token_type_ids = Array2::<i64>::zeros((batch, seq_len));

        debug!(batch, seq_len, "running ONNX inference");

        let input_ids_value = Value::from_array(input_ids).map_err(inference_err)?;
        let attention_mask_value =
            Value::from_array(attention_mask.clone()).map_err(inference_err)?;
        let token_type_ids_value = Value::from_array(token_type_ids).map_err(inference_err)?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| inference_err("ONNX session lock poisoned"))?;
        let outputs = session
            .run(ort::inputs![
                "input_ids" => input_ids_value,
                "attention_mask" => attention_mask_value,
                "token_type_ids" => token_type_ids_value
            ])
            .map_err(inference_err)?;

        let hidden = outputs[0]
            .try_extract_array::<f32>()
            .map_err(inference_err)?
            .into_dimensionality::<Ix3>()
            .map_err(|e| inference_err(format!("expected [batch, seq, hidden] output: {e}")))?;

        let mut pooled = mean_pool(hidden, attention_mask.view());
        for row in &mut pooled {
            l2_normalize(row);
        }
        Ok(pooled)
    }
}

impl TextEncoder for E5Encoder {
    fn encode(&self, texts: &[String]) -> Result<Vec<EmbeddingVector>> {
        let vectors = self.run(texts)?;
        if let Some((i, v)) = vectors
            .iter()
            .enumerate()
            .find(|(_, v)| v.len() != self.dimension)
        {
            return Err(inference_err(format!(
                "unexpected embedding dimension at index {i}: {} (expected {})",
                v.len(),
                self.dimension
            )));
        }
        Ok(vectors.into_iter().map(EmbeddingVector::new).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
