// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::error::AppError;

pub fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Scales `v` to unit length in place.
///
/// Fails on non-finite components or a norm too small to divide by, so a
/// caller never hands out a vector that is not unit length.
pub fn normalize_l2(v: &mut [f32]) -> Result<(), AppError> {
    if v.iter().any(|x| !x.is_finite()) {
        return Err(AppError::InferenceError(
            "Embedding contains non-finite values".to_string(),
        ));
    }

    let norm = l2_norm(v);
    if norm <= 1e-12 {
        return Err(AppError::InferenceError(
            "Embedding has zero norm and cannot be normalized".to_string(),
        ));
    }

    for x in v.iter_mut() {
        *x /= norm;
    }
    Ok(())
}

pub fn cosine_similarity(v1: &[f32], v2: &[f32]) -> Result<f32, AppError> {
    if v1.len() != v2.len() {
        return Err(AppError::InvalidInput(format!(
            "Vector dimensions mismatch: {} vs {}",
            v1.len(),
            v2.len()
        )));
    }

    let dot_product: f32 = v1.iter().zip(v2.iter()).map(|(a, b)| a * b).sum();
    let norm_a = l2_norm(v1);
    let norm_b = l2_norm(v2);

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    Ok(dot_product / (norm_a * norm_b))
}
