// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod config;
pub mod device;
pub mod domain;
pub mod engine;
pub mod error;
pub mod grpc;
pub mod model;
pub mod service;
pub mod text;
pub mod utils;
pub mod vision;

pub use config::{AppConfig, DeviceType, EmbeddingModelConfig, RecognitionModelConfig};
pub use domain::{
    EmbedResponse, ImageEmbedRequest, RecognizeTextRequest, RecognizeTextResponse,
    TextEmbedRequest,
};
pub use engine::{ClipEmbedder, EmbeddingModel, RecognitionModel, TrOcrRecognizer};
pub use error::{AppError, ErrorKind, HandlerError};
pub use service::{Operation, ServiceDispatcher};
