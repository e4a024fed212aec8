// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::error::AppError;
use candle_core::{DType, Device, Tensor};
use image::RgbImage;
use image::imageops::{self, FilterType};
use serde::Deserialize;
use std::path::Path;

pub const CLIP_MEAN: [f32; 3] = [0.481_454_66, 0.457_827_5, 0.408_210_73];
pub const CLIP_STD: [f32; 3] = [0.268_629_54, 0.261_302_58, 0.275_777_11];

const VIT_MEAN: [f32; 3] = [0.5, 0.5, 0.5];
const VIT_STD: [f32; 3] = [0.5, 0.5, 0.5];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeMode {
    /// Scale the shortest edge to the target, then center-crop a square.
    ShortestEdgeCenterCrop,
    /// Scale both edges to the target, ignoring aspect ratio.
    Exact,
}

/// Resize and normalization parameters of one vision encoder.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageNormalization {
    pub image_size: u32,
    pub mean: [f32; 3],
    pub std: [f32; 3],
    pub resize: ResizeMode,
    pub filter: FilterType,
}

#[derive(Debug, Deserialize)]
struct PreprocessorConfig {
    image_mean: Option<Vec<f32>>,
    image_std: Option<Vec<f32>>,
}

impl ImageNormalization {
    pub fn clip(image_size: u32) -> Self {
        Self {
            image_size,
            mean: CLIP_MEAN,
            std: CLIP_STD,
            resize: ResizeMode::ShortestEdgeCenterCrop,
            filter: FilterType::CatmullRom,
        }
    }

    pub fn vit(image_size: u32) -> Self {
        Self {
            image_size,
            mean: VIT_MEAN,
            std: VIT_STD,
            resize: ResizeMode::Exact,
            filter: FilterType::Triangle,
        }
    }

    /// Overrides mean/std from a `preprocessor_config.json`, keeping the
    /// current values for keys that are absent.
    pub fn with_preprocessor_config<P: AsRef<Path>>(mut self, path: P) -> Result<Self, AppError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: PreprocessorConfig = serde_json::from_str(&content)
            .map_err(|e| AppError::ModelLoadError(format!("Invalid preprocessor config: {}", e)))?;

        if let Some(mean) = config.image_mean {
            self.mean = to_channels(&mean, "image_mean")?;
        }
        if let Some(std) = config.image_std {
            self.std = to_channels(&std, "image_std")?;
        }
        if self.std.iter().any(|s| *s == 0.0) {
            return Err(AppError::ModelLoadError(
                "image_std must not contain zeros".to_string(),
            ));
        }
        Ok(self)
    }

    pub fn resize(&self, image: &RgbImage) -> RgbImage {
        let size = self.image_size;
        match self.resize {
            ResizeMode::Exact => imageops::resize(image, size, size, self.filter),
            ResizeMode::ShortestEdgeCenterCrop => {
                // The crop window is taken in source pixels, so the only
                // buffer allocated at target scale is size x size.
                let (w, h) = image.dimensions();
                let side = w.min(h);
                let x = (w - side) / 2;
                let y = (h - side) / 2;
                let square = imageops::crop_imm(image, x, y, side, side).to_image();
                imageops::resize(&square, size, size, self.filter)
            }
        }
    }

    /// Produces a `(1, 3, size, size)` f32 tensor on `device`.
    pub fn to_tensor(&self, image: &RgbImage, device: &Device) -> Result<Tensor, AppError> {
        let resized = self.resize(image);
        let (w, h) = resized.dimensions();
        let raw = resized.into_raw();

        let pixels = Tensor::from_vec(raw, (h as usize, w as usize, 3), &Device::Cpu)
            .and_then(|t| t.permute((2, 0, 1)))
            .and_then(|t| t.to_dtype(DType::F32))
            .and_then(|t| t.affine(1.0 / 255.0, 0.0))
            .map_err(preprocessing_error)?;

        let channels = pixels.dims()[0];
        if channels != 3 {
            return Err(AppError::PreprocessingError(format!(
                "Expected 3 color channels, got {}",
                channels
            )));
        }

        let mean = Tensor::new(self.mean.as_slice(), &Device::Cpu)
            .and_then(|t| t.reshape((3, 1, 1)))
            .map_err(preprocessing_error)?;
        let std = Tensor::new(self.std.as_slice(), &Device::Cpu)
            .and_then(|t| t.reshape((3, 1, 1)))
            .map_err(preprocessing_error)?;

        pixels
            .broadcast_sub(&mean)
            .and_then(|t| t.broadcast_div(&std))
            .and_then(|t| t.unsqueeze(0))
            .and_then(|t| t.to_device(device))
            .map_err(preprocessing_error)
    }
}

fn to_channels(values: &[f32], key: &str) -> Result<[f32; 3], AppError> {
    <[f32; 3]>::try_from(values).map_err(|_| {
        AppError::ModelLoadError(format!(
            "{} must have 3 entries, got {}",
            key,
            values.len()
        ))
    })
}

fn preprocessing_error(e: candle_core::Error) -> AppError {
    AppError::PreprocessingError(e.to_string())
}
