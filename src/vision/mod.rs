// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod decode;
pub mod preprocess;

pub use decode::{decode_image, decode_image_with_limits};
pub use preprocess::{CLIP_MEAN, CLIP_STD, ImageNormalization, ResizeMode};
