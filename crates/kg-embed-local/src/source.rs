use std::path::{Path, PathBuf};

use hf_hub::api::tokio::Api;
use tracing::info;

use kg_embed_core::error::{ModelError, Result};

/// Where the ONNX graph and tokenizer come from.
#[derive(Debug, Clone)]
pub struct ModelSource {
    /// Hugging Face repo id, e.g. `intfloat/e5-large-v2`.
    pub repo_id: String,
    /// ONNX graph path inside the repo (or inside `local_dir`).
    pub onnx_file: String,
    /// Tokenizer path inside the repo (or inside `local_dir`).
    pub tokenizer_file: String,
    /// When set, files are read from this directory and nothing is downloaded.
    pub local_dir: Option<PathBuf>,
}

/// Resolved on-disk artifact paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelFiles {
    pub model: PathBuf,
    pub tokenizer: PathBuf,
}

impl ModelSource {
    pub fn e5_large_v2() -> Self {
        Self {
            repo_id: "intfloat/e5-large-v2".into(),
            onnx_file: "onnx/model.onnx".into(),
            tokenizer_file: "tokenizer.json".into(),
            local_dir: None,
        }
    }

    /// Locate the model files, downloading them into the hub cache on first use.
    pub async fn resolve(&self) -> Result<ModelFiles> {
        match &self.local_dir {
            Some(dir) => self.resolve_local(dir),
            None => self.download().await,
        }
    }

    fn resolve_local(&self, dir: &Path) -> Result<ModelFiles> {
        let files = ModelFiles {
            model: dir.join(&self.onnx_file),
            tokenizer: dir.join(&self.tokenizer_file),
        };
        for path in [&files.model, &files.tokenizer] {
            if !path.is_file() {
                return Err(ModelError::Load(format!("model file not found: {}", path.display())).into());
            }
        }
        info!(dir = %dir.display(), "using local model files");
        Ok(files)
    }

    async fn download(&self) -> Result<ModelFiles> {
        info!(repo = %self.repo_id, "fetching model artifacts from the hub");
        let api = Api::new().map_err(|e| ModelError::Load(format!("hub client: {e}")))?;
        let repo = api.model(self.repo_id.clone());

        let model = repo
            .get(&self.onnx_file)
            .await
            .map_err(|e| ModelError::Load(format!("{}/{}: {e}", self.repo_id, self.onnx_file)))?;
        let tokenizer = repo
            .get(&self.tokenizer_file)
            .await
            .map_err(|e| {
                ModelError::Load(format!("{}/{}: {e}", self.repo_id, self.tokenizer_file))
            })?;

        Ok(ModelFiles { model, tokenizer })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kg_embed_core::error::EmbedError;

    #[test]
    fn e5_defaults() {
        let source = ModelSource::e5_large_v2();
        assert_eq!(source.repo_id, "intfloat/e5-large-v2");
        assert_eq!(source.onnx_file, "onnx/model.onnx");
        assert_eq!(source.tokenizer_file, "tokenizer.json");
        assert!(source.local_dir.is_none());
    }

    #[tokio::test]
    async fn resolves_existing_local_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("onnx")).unwrap();
        std::fs::write(dir.path().join("onnx/model.onnx"), b"graph").unwrap();
        std::fs::write(dir.path().join("tokenizer.json"), b"{}").unwrap();

        let source = ModelSource {
            local_dir: Some(dir.path().to_path_buf()),
            ..ModelSource::e5_large_v2()
        };
        let files = source.resolve().await.unwrap();
        assert_eq!(files.model, dir.path().join("onnx/model.onnx"));
        assert_eq!(files.tokenizer, dir.path().join("tokenizer.json"));
    }

    #[tokio::test]
    async fn missing_local_file_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("tokenizer.json"), b"{}").unwrap();

        let source = ModelSource {
            local_dir: Some(dir.path().to_path_buf()),
            ..ModelSource::e5_large_v2()
        };
        let err = source.resolve().await.unwrap_err();
        assert!(matches!(err, EmbedError::Model(ModelError::Load(ref m)) if m.contains("model.onnx")));
    }
}
