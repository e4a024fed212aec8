// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::RecognitionModel;
use crate::config::model::RecognitionModelConfig;
use crate::device::{device_label, select_device};
use crate::error::AppError;
use crate::model::ModelRepo;
use crate::text::Tokenizer;
use crate::vision::ImageNormalization;
use candle_core::{DType, Device, Module, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::{trocr, vit};
use image::RgbImage;
use serde::Deserialize;
use std::path::Path;
use std::sync::Mutex;

#[derive(Deserialize)]
struct VisionEncoderDecoderConfig {
    encoder: vit::Config,
    decoder: trocr::TrOCRConfig,
}

/// Special token ids driving the decode loop.
#[derive(Debug, Clone, Copy)]
struct DecodeParams {
    start_token_id: u32,
    eos_token_id: u32,
    max_new_tokens: usize,
}

pub struct TrOcrRecognizer {
    // The decoder mutates its KV cache, so one request decodes at a time.
    model: Mutex<trocr::TrOCRModel>,
    tokenizer: Tokenizer,
    normalization: ImageNormalization,
    params: DecodeParams,
    device: Device,
    model_name: String,
}

fn load_config(path: &Path) -> Result<VisionEncoderDecoderConfig, AppError> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| AppError::ModelLoadError(e.to_string()))
}

/// Output of one greedy decode.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Decoded {
    token_ids: Vec<u32>,
    finished: bool,
}

impl TrOcrRecognizer {
    pub fn load(config: &RecognitionModelConfig) -> Result<Self, AppError> {
        if config.max_new_tokens == 0 {
            return Err(AppError::ModelLoadError(
                "max_new_tokens must be at least 1".to_string(),
            ));
        }

        let device = select_device(config.device);
        let repo = ModelRepo::resolve(
            &config.model_name,
            &config.revision,
            config.model_path.as_deref(),
        )?;

        let model_config = load_config(&repo.get("config.json")?)?;
        let weights_filename = repo.get("model.safetensors")?;

        let tokenizer_filename = match &repo {
            ModelRepo::Local(_) => repo.get("tokenizer.json")?,
            ModelRepo::Hub { .. } => {
                ModelRepo::hub(&config.tokenizer_repo, "main")?.get("tokenizer.json")?
            }
        };
        let tokenizer = Tokenizer::from_file(&tokenizer_filename)?;

        let mut normalization = ImageNormalization::vit(model_config.encoder.image_size as u32);
        if let Some(path) = repo.get_optional("preprocessor_config.json") {
            normalization = normalization.with_preprocessor_config(path)?;
        }

        tracing::info!(
            "Loading safetensors model weights from: {:?}",
            weights_filename
        );
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_filename], DType::F32, &device)
        }
        .map_err(|e| AppError::ModelLoadError(e.to_string()))?;

        let recognizer = Self::new(
            vb,
            &model_config,
            tokenizer,
            normalization,
            config.max_new_tokens,
            &config.model_name,
        )?;

        tracing::info!(
            "Loaded TrOCR model {} from {} on {} (image size {})",
            config.model_name,
            repo.describe(),
            device_label(&recognizer.device),
            recognizer.normalization.image_size
        );
        Ok(recognizer)
    }

    fn new(
        vb: VarBuilder,
        model_config: &VisionEncoderDecoderConfig,
        tokenizer: Tokenizer,
        normalization: ImageNormalization,
        max_new_tokens: usize,
        model_name: &str,
    ) -> Result<Self, AppError> {
        let device = vb.device().clone();
        let model = trocr::TrOCRModel::new(&model_config.encoder, &model_config.decoder, vb)
            .map_err(|e| AppError::ModelLoadError(e.to_string()))?;

        let params = DecodeParams {
            start_token_id: model_config.decoder.decoder_start_token_id as u32,
            eos_token_id: model_config.decoder.eos_token_id as u32,
            max_new_tokens,
        };

        Ok(Self {
            model: Mutex::new(model),
            tokenizer,
            normalization,
            params,
            device,
            model_name: model_name.to_string(),
        })
    }

    /// Greedy decode from the start token until EOS or the token budget.
    fn generate(&self, pixel_values: &Tensor) -> Result<Decoded, AppError> {
        // A panic mid-decode poisons the lock; the cache is reset below anyway.
        let mut model = self
            .model
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        model.reset_kv_cache();

        let encoder_xs = model.encoder().forward(pixel_values)?;

        let mut token_ids = vec![self.params.start_token_id];
        for index in 0..self.params.max_new_tokens {
            let context_size = if index >= 1 { 1 } else { token_ids.len() };
            let start_pos = token_ids.len().saturating_sub(context_size);
            let input_ids = Tensor::new(&token_ids[start_pos..], &self.device)?.unsqueeze(0)?;

            let logits = model.decode(&input_ids, &encoder_xs, start_pos)?;
            let logits = logits.squeeze(0)?;
            let logits = logits.get(logits.dim(0)? - 1)?;
            let token = logits.argmax(0)?.to_scalar::<u32>()?;

            token_ids.push(token);
            if token == self.params.eos_token_id {
                tracing::debug!("Decoded {} tokens", token_ids.len() - 1);
                return Ok(Decoded {
                    token_ids,
                    finished: true,
                });
            }
        }

        Ok(Decoded {
            token_ids,
            finished: false,
        })
    }
}

impl RecognitionModel for TrOcrRecognizer {
    fn recognize(&self, image: &RgbImage) -> Result<String, AppError> {
        let pixel_values = self.normalization.to_tensor(image, &self.device)?;
        let decoded = self.generate(&pixel_values)?;
        if !decoded.finished {
            return Err(AppError::InferenceError(format!(
                "Decoding did not finish within {} tokens",
                self.params.max_new_tokens
            )));
        }

        let text = self.tokenizer.decode(&decoded.token_ids, true)?;
        Ok(text.trim().to_string())
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
