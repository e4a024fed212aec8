// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::model::{
    DEFAULT_CLIP_MODEL, DEFAULT_CLIP_REVISION, DEFAULT_MAX_NEW_TOKENS, DEFAULT_TROCR_MODEL,
    DEFAULT_TROCR_REVISION, DEFAULT_TROCR_TOKENIZER, EmbeddingModelConfig, RecognitionModelConfig,
};
use crate::utils::constants::{
    DEFAULT_MAX_CONCURRENT_REQUESTS, MAX_IMAGE_ALLOC_MB, MAX_IMAGE_DIMENSION,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone, Serialize, Default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub embedding: EmbeddingModelConfig,
    pub recognition: RecognitionModelConfig,
    pub image: ImageConfig,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Deserialize, Clone, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound on requests running inference at the same time.
    pub max_concurrent_requests: usize,
}

/// Decode limits applied to client-supplied images.
#[derive(Debug, Deserialize, Clone, Copy, Serialize)]
pub struct ImageConfig {
    pub max_width: u32,
    pub max_height: u32,
    pub max_alloc_mb: u64,
}

#[derive(Debug, Deserialize, Clone, Serialize)]
pub struct MonitoringConfig {
    pub log_level: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 50051,
            max_concurrent_requests: DEFAULT_MAX_CONCURRENT_REQUESTS,
        }
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_width: MAX_IMAGE_DIMENSION,
            max_height: MAX_IMAGE_DIMENSION,
            max_alloc_mb: MAX_IMAGE_ALLOC_MB,
        }
    }
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            log_level: Some("info".to_string()),
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    env_prefix: String,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: "CLIPOCR".to_string(),
        }
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.config_path = Some(path.into());
        self
    }

    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        let mut config = config::Config::builder();

        config = config.set_default("server.host", "0.0.0.0")?;
        config = config.set_default("server.port", 50051)?;
        config = config.set_default(
            "server.max_concurrent_requests",
            DEFAULT_MAX_CONCURRENT_REQUESTS as u64,
        )?;

        config = config.set_default("embedding.model_name", DEFAULT_CLIP_MODEL)?;
        config = config.set_default("embedding.revision", DEFAULT_CLIP_REVISION)?;
        config = config.set_default("embedding.device", "cpu")?;

        config = config.set_default("recognition.model_name", DEFAULT_TROCR_MODEL)?;
        config = config.set_default("recognition.revision", DEFAULT_TROCR_REVISION)?;
        config = config.set_default("recognition.tokenizer_repo", DEFAULT_TROCR_TOKENIZER)?;
        config = config.set_default("recognition.device", "cpu")?;
        config = config.set_default("recognition.max_new_tokens", DEFAULT_MAX_NEW_TOKENS as u64)?;

        config = config.set_default("image.max_width", MAX_IMAGE_DIMENSION)?;
        config = config.set_default("image.max_height", MAX_IMAGE_DIMENSION)?;
        config = config.set_default("image.max_alloc_mb", MAX_IMAGE_ALLOC_MB)?;

        config = config.set_default("monitoring.log_level", "info")?;

        if let Some(path) = &self.config_path {
            if path.exists() {
                config = config.add_source(config::File::from(path.as_path()));
            } else {
                return Err(ConfigError::Message(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
        } else if PathBuf::from("config.toml").exists() {
            config = config.add_source(config::File::with_name("config"));
        }

        config = config.add_source(
            config::Environment::with_prefix(&self.env_prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .ignore_empty(true),
        );

        config.build()?.try_deserialize().map_err(ConfigError::from)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Message(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(e: config::ConfigError) -> Self {
        ConfigError::Message(e.to_string())
    }
}

impl AppConfig {
    /// Defaults, then `config.toml` if present, then `CLIPOCR_*` variables.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        ConfigLoader::new().load()
    }
}
