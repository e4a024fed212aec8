// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod constants;
pub mod vector;

pub use constants::{
    DEFAULT_MAX_CONCURRENT_REQUESTS, MAX_IMAGE_ALLOC_MB, MAX_IMAGE_DIMENSION, NORM_TOLERANCE,
};
pub use vector::{cosine_similarity, l2_norm, normalize_l2};
