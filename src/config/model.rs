// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_CLIP_MODEL: &str = "openai/clip-vit-base-patch32";
pub const DEFAULT_CLIP_REVISION: &str = "refs/pr/15";
pub const DEFAULT_TROCR_MODEL: &str = "microsoft/trocr-base-printed";
pub const DEFAULT_TROCR_REVISION: &str = "refs/pr/7";
pub const DEFAULT_TROCR_TOKENIZER: &str = "ToluClassics/candle-trocr-tokenizer";
pub const DEFAULT_MAX_NEW_TOKENS: usize = 128;

/// Compute device a model is placed on. Accelerators carry an ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceType {
    #[default]
    Cpu,
    Cuda(usize),
    Metal(usize),
}

impl FromStr for DeviceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        let (name, ordinal) = match lower.split_once(':') {
            Some((name, idx)) => {
                let idx = idx
                    .parse::<usize>()
                    .map_err(|_| format!("Invalid device ordinal in '{}'", s))?;
                (name.to_string(), idx)
            }
            None => (lower, 0),
        };

        match name.as_str() {
            "cpu" if ordinal == 0 => Ok(DeviceType::Cpu),
            "cuda" | "gpu" => Ok(DeviceType::Cuda(ordinal)),
            "metal" | "mps" => Ok(DeviceType::Metal(ordinal)),
            _ => Err(format!(
                "Unknown device: {} (expected cpu, cuda[:N] or metal[:N])",
                s
            )),
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceType::Cpu => write!(f, "cpu"),
            DeviceType::Cuda(0) => write!(f, "cuda"),
            DeviceType::Cuda(n) => write!(f, "cuda:{}", n),
            DeviceType::Metal(0) => write!(f, "metal"),
            DeviceType::Metal(n) => write!(f, "metal:{}", n),
        }
    }
}

impl<'de> Deserialize<'de> for DeviceType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl Serialize for DeviceType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Settings for the CLIP embedding adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingModelConfig {
    pub model_name: String,
    pub revision: String,
    pub device: DeviceType,
    /// Local directory holding `model.safetensors` and `tokenizer.json`;
    /// when unset the files are fetched from the Hugging Face Hub.
    pub model_path: Option<PathBuf>,
}

impl Default for EmbeddingModelConfig {
    fn default() -> Self {
        Self {
            model_name: DEFAULT_CLIP_MODEL.to_string(),
            revision: DEFAULT_CLIP_REVISION.to_string(),
            device: DeviceType::Cpu,
            model_path: None,
        }
    }
}

/// Settings for the TrOCR recognition adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognitionModelConfig {
    pub model_name: String,
    pub revision: String,
    pub tokenizer_repo: String,
    pub device: DeviceType,
    pub model_path: Option<PathBuf>,
    /// Decode budget; generation that has not emitted EOS by then fails.
    pub max_new_tokens: usize,
}

impl Default for RecognitionModelConfig {
    fn default() -> Self {
        Self {
            model_name: DEFAULT_TROCR_MODEL.to_string(),
            revision: DEFAULT_TROCR_REVISION.to_string(),
            tokenizer_repo: DEFAULT_TROCR_TOKENIZER.to_string(),
            device: DeviceType::Cpu,
            model_path: None,
            max_new_tokens: DEFAULT_MAX_NEW_TOKENS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_type_parse() {
        assert_eq!("cpu".parse::<DeviceType>().unwrap(), DeviceType::Cpu);
        assert_eq!("CUDA".parse::<DeviceType>().unwrap(), DeviceType::Cuda(0));
        assert_eq!("cuda:1".parse::<DeviceType>().unwrap(), DeviceType::Cuda(1));
        assert_eq!("metal".parse::<DeviceType>().unwrap(), DeviceType::Metal(0));
        assert!("tpu".parse::<DeviceType>().is_err());
        assert!("cuda:x".parse::<DeviceType>().is_err());
        assert!("cpu:2".parse::<DeviceType>().is_err());
    }

    #[test]
    fn test_device_type_display() {
        assert_eq!(DeviceType::Cpu.to_string(), "cpu");
        assert_eq!(DeviceType::Cuda(0).to_string(), "cuda");
        assert_eq!(DeviceType::Cuda(2).to_string(), "cuda:2");
        assert_eq!(DeviceType::Metal(0).to_string(), "metal");
    }

    #[test]
    fn test_device_type_serialization() {
        let json = serde_json::to_string(&DeviceType::Cuda(1)).unwrap();
        assert_eq!(json, "\"cuda:1\"");

        let decoded: DeviceType = serde_json::from_str("\"metal\"").unwrap();
        assert_eq!(decoded, DeviceType::Metal(0));

        assert!(serde_json::from_str::<DeviceType>("\"npu\"").is_err());
    }

    #[test]
    fn test_embedding_model_config_default() {
        let config = EmbeddingModelConfig::default();
        assert_eq!(config.model_name, "openai/clip-vit-base-patch32");
        assert_eq!(config.device, DeviceType::Cpu);
        assert!(config.model_path.is_none());
    }

    #[test]
    fn test_recognition_model_config_default() {
        let config = RecognitionModelConfig::default();
        assert_eq!(config.model_name, "microsoft/trocr-base-printed");
        assert_eq!(config.max_new_tokens, DEFAULT_MAX_NEW_TOKENS);
        assert_eq!(config.device, DeviceType::Cpu);
    }
}
