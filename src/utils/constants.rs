// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 10;
pub const MAX_IMAGE_DIMENSION: u32 = 16_384;
pub const MAX_IMAGE_ALLOC_MB: u64 = 512;

/// Tolerance on the norm of a returned embedding.
pub const NORM_TOLERANCE: f32 = 1e-5;
