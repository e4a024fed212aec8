// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! Deterministic stand-ins for the real models.

#![allow(dead_code)]

use clipocr::config::ImageConfig;
use clipocr::{AppError, EmbeddingModel, RecognitionModel, ServiceDispatcher};
use image::{DynamicImage, ImageFormat, RgbImage};
use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub const MOCK_DIMENSION: usize = 512;

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 1469598103934665603;
    for &byte in bytes {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(1099511628211);
    }
    hash
}

fn seeded_unit_vector(seed: u64, dimension: usize) -> Vec<f32> {
    let mut state = seed;
    let mut embedding: Vec<f32> = (0..dimension)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            ((state >> 32) as u32 as f32 / u32::MAX as f32) * 2.0 - 1.0
        })
        .collect();
    clipocr::utils::normalize_l2(&mut embedding).expect("seeded vector is non-zero");
    embedding
}

/// Tracks how many calls are inside a model at the same time.
#[derive(Default)]
pub struct ConcurrencyProbe {
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl ConcurrencyProbe {
    pub fn enter(&self) -> ProbeGuard<'_> {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        ProbeGuard { probe: self }
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

pub struct ProbeGuard<'a> {
    probe: &'a ConcurrencyProbe,
}

impl Drop for ProbeGuard<'_> {
    fn drop(&mut self) {
        self.probe.current.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Hash-seeded embedder. Text containing "panic" makes it panic, text
/// containing "explode" makes it fail like a device error.
pub struct HashEmbedder {
    pub dimension: usize,
    pub delay: Duration,
    pub probe: Arc<ConcurrencyProbe>,
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            delay: Duration::ZERO,
            probe: Arc::new(ConcurrencyProbe::default()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn simulate_work(&self) -> ProbeGuard<'_> {
        let guard = self.probe.enter();
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        guard
    }
}

impl EmbeddingModel for HashEmbedder {
    fn embed_text(&self, text: &str) -> Result<Vec<f32>, AppError> {
        let _guard = self.simulate_work();
        if text.contains("panic") {
            panic!("simulated model panic");
        }
        if text.contains("explode") {
            return Err(AppError::InferenceError("CUDA out of memory".to_string()));
        }
        Ok(seeded_unit_vector(fnv1a(text.as_bytes()), self.dimension))
    }

    fn embed_image(&self, image: &RgbImage) -> Result<Vec<f32>, AppError> {
        let _guard = self.simulate_work();
        let mut seed = fnv1a(image.as_raw());
        seed ^= ((image.width() as u64) << 32) | image.height() as u64;
        Ok(seeded_unit_vector(seed, self.dimension))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        "mock/hash-embedder"
    }
}

/// Reports uniform images as blank and everything else by its size.
pub struct SizeRecognizer {
    pub delay: Duration,
}

impl SizeRecognizer {
    pub fn new() -> Self {
        Self {
            delay: Duration::ZERO,
        }
    }
}

impl RecognitionModel for SizeRecognizer {
    fn recognize(&self, image: &RgbImage) -> Result<String, AppError> {
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        let first = image.get_pixel(0, 0);
        if image.pixels().all(|p| p == first) {
            return Ok(String::new());
        }
        Ok(format!("TEXT {}x{}", image.width(), image.height()))
    }

    fn model_name(&self) -> &str {
        "mock/size-recognizer"
    }
}

/// Never finishes a decode.
pub struct RunawayRecognizer;

impl RecognitionModel for RunawayRecognizer {
    fn recognize(&self, _image: &RgbImage) -> Result<String, AppError> {
        Err(AppError::InferenceError(
            "Decoding did not finish within 128 tokens".to_string(),
        ))
    }

    fn model_name(&self) -> &str {
        "mock/runaway"
    }
}

pub fn dispatcher_with(
    embedder: Arc<dyn EmbeddingModel>,
    recognizer: Arc<dyn RecognitionModel>,
    max_concurrent_requests: usize,
) -> ServiceDispatcher {
    ServiceDispatcher::new(
        embedder,
        recognizer,
        max_concurrent_requests,
        ImageConfig::default(),
    )
}

pub fn mock_dispatcher() -> ServiceDispatcher {
    dispatcher_with(
        Arc::new(HashEmbedder::new(MOCK_DIMENSION)),
        Arc::new(SizeRecognizer::new()),
        10,
    )
}

pub fn encode(image: DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, format).expect("encode test image");
    buf.into_inner()
}

pub fn png(image: DynamicImage) -> Vec<u8> {
    encode(image, ImageFormat::Png)
}

/// A diagonal gradient, so each pixel differs from its neighbours.
pub fn gradient_rgb(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x * 7 % 256) as u8, (y * 5 % 256) as u8, ((x + y) % 256) as u8])
    })
}

pub fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}
