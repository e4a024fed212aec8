// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::EmbeddingModel;
use crate::config::model::EmbeddingModelConfig;
use crate::device::{device_label, select_device};
use crate::error::AppError;
use crate::model::ModelRepo;
use crate::text::Tokenizer;
use crate::utils::normalize_l2;
use crate::vision::ImageNormalization;
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::clip::{ClipConfig, ClipModel};
use image::RgbImage;

pub struct ClipEmbedder {
    model: ClipModel,
    tokenizer: Tokenizer,
    normalization: ImageNormalization,
    device: Device,
    model_name: String,
    dimension: usize,
}

/// Architecture config for a CLIP checkpoint name.
fn clip_config_for(model_name: &str) -> Result<ClipConfig, AppError> {
    let name = model_name.trim_end_matches('/').to_lowercase();
    if name.ends_with("clip-vit-base-patch32") {
        Ok(ClipConfig::vit_base_patch32())
    } else {
        Err(AppError::ModelLoadError(format!(
            "Unsupported CLIP model: {} (supported: openai/clip-vit-base-patch32)",
            model_name
        )))
    }
}

impl ClipEmbedder {
    pub fn load(config: &EmbeddingModelConfig) -> Result<Self, AppError> {
        let clip_config = clip_config_for(&config.model_name)?;
        let device = select_device(config.device);

        let repo = ModelRepo::resolve(
            &config.model_name,
            &config.revision,
            config.model_path.as_deref(),
        )?;
        let weights_filename = repo.get("model.safetensors")?;
        let tokenizer_filename = repo.get("tokenizer.json")?;

        let tokenizer = Tokenizer::from_file_with_max_length(
            &tokenizer_filename,
            clip_config.text_config.max_position_embeddings,
        )?;

        tracing::info!(
            "Loading safetensors model weights from: {:?}",
            weights_filename
        );
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_filename], DType::F32, &device)
        }
        .map_err(|e| AppError::ModelLoadError(e.to_string()))?;

        let embedder = Self::new(vb, &clip_config, tokenizer, &config.model_name)?;
        tracing::info!(
            "Loaded CLIP model {} from {} on {} (dimension {})",
            config.model_name,
            repo.describe(),
            device_label(&embedder.device),
            embedder.dimension
        );
        Ok(embedder)
    }

    /// Builds the adapter from already resolved weights. The device is the
    /// one `vb` places tensors on.
    pub fn new(
        vb: VarBuilder,
        clip_config: &ClipConfig,
        tokenizer: Tokenizer,
        model_name: &str,
    ) -> Result<Self, AppError> {
        let device = vb.device().clone();
        let model =
            ClipModel::new(vb, clip_config).map_err(|e| AppError::ModelLoadError(e.to_string()))?;

        Ok(Self {
            model,
            tokenizer,
            normalization: ImageNormalization::clip(clip_config.image_size as u32),
            device,
            model_name: model_name.to_string(),
            dimension: clip_config.text_config.projection_dim,
        })
    }

    fn features_to_vec(features: Tensor) -> Result<Vec<f32>, AppError> {
        let mut embedding = features
            .squeeze(0)?
            .to_dtype(DType::F32)?
            .to_vec1::<f32>()?;
        normalize_l2(&mut embedding)?;
        Ok(embedding)
    }
}

impl EmbeddingModel for ClipEmbedder {
    fn embed_text(&self, text: &str) -> Result<Vec<f32>, AppError> {
        let encoding = self.tokenizer.encode(text, true)?;
        if encoding.is_truncated() {
            tracing::debug!(
                "Text truncated to {} tokens",
                self.tokenizer.get_max_length()
            );
        }

        let input_ids = Tensor::new(encoding.get_ids(), &self.device)?.unsqueeze(0)?;
        let features = self.model.get_text_features(&input_ids)?;
        tracing::debug!("Text features shape: {:?}", features.shape());

        Self::features_to_vec(features)
    }

    fn embed_image(&self, image: &RgbImage) -> Result<Vec<f32>, AppError> {
        let pixel_values = self.normalization.to_tensor(image, &self.device)?;
        let features = self.model.get_image_features(&pixel_values)?;
        tracing::debug!("Image features shape: {:?}", features.shape());

        Self::features_to_vec(features)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
