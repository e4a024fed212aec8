// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod clip;
pub mod trocr;

use crate::error::AppError;
use image::RgbImage;

/// Joint text/image embedding model.
///
/// Both towers project into the same space, so [`dimension`](Self::dimension)
/// holds for text and image vectors alike. Returned vectors are unit length.
pub trait EmbeddingModel: Send + Sync {
    fn embed_text(&self, text: &str) -> Result<Vec<f32>, AppError>;

    fn embed_image(&self, image: &RgbImage) -> Result<Vec<f32>, AppError>;

    fn dimension(&self) -> usize;

    fn model_name(&self) -> &str;
}

/// Image-to-text recognition model.
pub trait RecognitionModel: Send + Sync {
    /// Returns the recognized text with special markers stripped. An empty
    /// string is a valid result.
    fn recognize(&self, image: &RgbImage) -> Result<String, AppError>;

    fn model_name(&self) -> &str;
}

pub use clip::ClipEmbedder;
pub use trocr::TrOcrRecognizer;
