// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::ImageConfig;
use crate::error::AppError;
use image::{ImageReader, Limits, RgbImage};
use std::io::Cursor;

/// Decodes an encoded image with the default limits.
pub fn decode_image(bytes: &[u8]) -> Result<RgbImage, AppError> {
    decode_image_with_limits(bytes, &ImageConfig::default())
}

/// Decodes `bytes` into an 8-bit RGB grid.
///
/// The container format is sniffed from the content. Every failure is
/// reported as `InvalidInput`, including images larger than `limits`.
/// Grayscale, alpha, 16-bit and palette images are converted; alpha is dropped.
pub fn decode_image_with_limits(bytes: &[u8], limits: &ImageConfig) -> Result<RgbImage, AppError> {
    if bytes.is_empty() {
        return Err(AppError::InvalidInput("Image payload is empty".to_string()));
    }

    let mut reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| AppError::InvalidInput(format!("Failed to read image: {}", e)))?;

    let format = reader.format().ok_or_else(|| {
        AppError::InvalidInput("Unrecognized image format".to_string())
    })?;

    let max_alloc = limits.max_alloc_mb.saturating_mul(1024 * 1024);
    let mut decode_limits = Limits::default();
    decode_limits.max_image_width = Some(limits.max_width);
    decode_limits.max_image_height = Some(limits.max_height);
    decode_limits.max_alloc = Some(max_alloc);
    reader.limits(decode_limits);

    let image = reader.decode().map_err(|e| {
        AppError::InvalidInput(format!("Failed to decode {:?} image: {}", format, e))
    })?;

    if image.width() == 0 || image.height() == 0 {
        return Err(AppError::InvalidInput(format!(
            "Image has empty dimensions {}x{}",
            image.width(),
            image.height()
        )));
    }

    tracing::debug!(
        "Decoded {:?} image {}x{} ({:?})",
        format,
        image.width(),
        image.height(),
        image.color()
    );

    // Expanding gray or palette pixels to RGB can outgrow the decoded buffer.
    let rgb_bytes = u64::from(image.width()) * u64::from(image.height()) * 3;
    if rgb_bytes > max_alloc {
        return Err(AppError::InvalidInput(format!(
            "Image {}x{} needs {} bytes as RGB, limit is {} bytes",
            image.width(),
            image.height(),
            rgb_bytes,
            max_alloc
        )));
    }

    Ok(image.into_rgb8())
}
