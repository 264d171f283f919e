use std::path::PathBuf;

use kg_embed_core::config::{env_opt, env_or, env_parse_or};
use kg_embed_core::error::ConfigError;
use kg_embed_local::ModelSource;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_MAX_LENGTH: usize = 512;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub source: ModelSource,
    pub max_length: usize,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = env_parse_or("EMBEDDINGS_PORT", DEFAULT_PORT, "expected a port number")?;
        let max_length = env_parse_or(
            "E5_MAX_LENGTH",
            DEFAULT_MAX_LENGTH,
            "expected a positive token count",
        )?;
        if max_length == 0 {
            return Err(ConfigError::InvalidNumber {
                var: "E5_MAX_LENGTH",
                reason: "expected a positive token count",
            });
        }

        let defaults = ModelSource::e5_large_v2();
        let source = ModelSource {
            repo_id: env_or("E5_MODEL_ID", &defaults.repo_id),
            onnx_file: env_or("E5_ONNX_FILE", &defaults.onnx_file),
            tokenizer_file: env_or("E5_TOKENIZER_FILE", &defaults.tokenizer_file),
            local_dir: env_opt("E5_MODEL_DIR").map(PathBuf::from),
        };

        Ok(Self {
            port,
            source,
            max_length,
        })
    }
}
