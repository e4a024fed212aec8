// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! Checks against the published checkpoints. They download weights from the
//! Hugging Face Hub, so run them with `cargo test -- --ignored`.

use clipocr::utils::{cosine_similarity, l2_norm};
use clipocr::{
    ClipEmbedder, EmbeddingModel, EmbeddingModelConfig, RecognitionModel,
    RecognitionModelConfig, TrOcrRecognizer,
};
use image::{Rgb, RgbImage};

#[test]
#[ignore = "downloads openai/clip-vit-base-patch32"]
fn test_clip_text_and_image_embeddings() {
    let embedder = ClipEmbedder::load(&EmbeddingModelConfig::default()).unwrap();
    assert_eq!(embedder.dimension(), 512);

    let empty = embedder.embed_text("").unwrap();
    assert_eq!(empty.len(), 512);
    assert!((l2_norm(&empty) - 1.0).abs() < 1e-5);

    let red = RgbImage::from_pixel(300, 200, Rgb([220, 20, 20]));
    let image = embedder.embed_image(&red).unwrap();
    assert_eq!(image.len(), 512);
    assert!((l2_norm(&image) - 1.0).abs() < 1e-5);

    let red_text = embedder.embed_text("a red square").unwrap();
    let tree_text = embedder.embed_text("a photo of a tree in a forest").unwrap();
    assert!(
        cosine_similarity(&image, &red_text).unwrap()
            > cosine_similarity(&image, &tree_text).unwrap()
    );

    assert_eq!(embedder.embed_text("a red square").unwrap(), red_text);

    let long = "word ".repeat(400);
    assert_eq!(embedder.embed_text(&long).unwrap().len(), 512);
}

#[test]
#[ignore = "downloads microsoft/trocr-base-printed"]
fn test_trocr_blank_line() {
    let recognizer = TrOcrRecognizer::load(&RecognitionModelConfig::default()).unwrap();

    let blank = RgbImage::from_pixel(384, 64, Rgb([255, 255, 255]));
    let first = recognizer.recognize(&blank).unwrap();
    let second = recognizer.recognize(&blank).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, first.trim());
}
