// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEmbedRequest {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageEmbedRequest {
    pub image_data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmbedResponse {
    pub embedding: Vec<f32>,
}

impl EmbedResponse {
    pub fn dimension(&self) -> usize {
        self.embedding.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognizeTextRequest {
    pub image_data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognizeTextResponse {
    pub recognized_text: String,
}

impl From<&str> for TextEmbedRequest {
    fn from(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

impl From<Vec<u8>> for ImageEmbedRequest {
    fn from(image_data: Vec<u8>) -> Self {
        Self { image_data }
    }
}

impl From<Vec<u8>> for RecognizeTextRequest {
    fn from(image_data: Vec<u8>) -> Self {
        Self { image_data }
    }
}
