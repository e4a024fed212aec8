// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::handler::{EmbeddingHandler, RecognitionHandler};
use crate::config::{AppConfig, ImageConfig};
use crate::domain::{
    EmbedResponse, ImageEmbedRequest, RecognizeTextRequest, RecognizeTextResponse,
    TextEmbedRequest,
};
use crate::engine::{EmbeddingModel, RecognitionModel};
use crate::error::HandlerError;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GetTextEmbedding,
    GetImageEmbedding,
    RecognizeText,
}

impl Operation {
    pub const ALL: [Operation; 3] = [
        Operation::GetTextEmbedding,
        Operation::GetImageEmbedding,
        Operation::RecognizeText,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::GetTextEmbedding => "GetTextEmbedding",
            Operation::GetImageEmbedding => "GetImageEmbedding",
            Operation::RecognizeText => "RecognizeText",
        }
    }

    /// Human-readable prefix used in client-facing error messages.
    pub fn description(&self) -> &'static str {
        match self {
            Operation::GetTextEmbedding => "Text embedding",
            Operation::GetImageEmbedding => "Image embedding",
            Operation::RecognizeText => "Text recognition",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| format!("Unknown operation: {}", s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    TextEmbedding(TextEmbedRequest),
    ImageEmbedding(ImageEmbedRequest),
    RecognizeText(RecognizeTextRequest),
}

impl Request {
    pub fn operation(&self) -> Operation {
        match self {
            Request::TextEmbedding(_) => Operation::GetTextEmbedding,
            Request::ImageEmbedding(_) => Operation::GetImageEmbedding,
            Request::RecognizeText(_) => Operation::RecognizeText,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Embedding(EmbedResponse),
    RecognizedText(RecognizeTextResponse),
}

/// Routes requests to the handler of their operation.
///
/// Owns the single instance of each model. At most `max_concurrent_requests`
/// requests run at once; the rest wait for a permit. A permit is released when
/// the blocking work finishes, not when the caller stops waiting.
pub struct ServiceDispatcher {
    embedding: EmbeddingHandler,
    recognition: RecognitionHandler,
    permits: Arc<Semaphore>,
    max_concurrent_requests: usize,
}

impl ServiceDispatcher {
    pub fn new(
        embedding_model: Arc<dyn EmbeddingModel>,
        recognition_model: Arc<dyn RecognitionModel>,
        max_concurrent_requests: usize,
        image_limits: ImageConfig,
    ) -> Self {
        let max_concurrent_requests = if max_concurrent_requests == 0 {
            tracing::warn!("max_concurrent_requests is 0, using 1");
            1
        } else {
            max_concurrent_requests
        };

        Self {
            embedding: EmbeddingHandler::new(embedding_model, image_limits),
            recognition: RecognitionHandler::new(recognition_model, image_limits),
            permits: Arc::new(Semaphore::new(max_concurrent_requests)),
            max_concurrent_requests,
        }
    }

    pub fn from_config(
        embedding_model: Arc<dyn EmbeddingModel>,
        recognition_model: Arc<dyn RecognitionModel>,
        config: &AppConfig,
    ) -> Self {
        Self::new(
            embedding_model,
            recognition_model,
            config.server.max_concurrent_requests,
            config.image,
        )
    }

    pub async fn dispatch(&self, request: Request) -> Result<Response, HandlerError> {
        match request {
            Request::TextEmbedding(req) => self.text_embedding(req).await.map(Response::Embedding),
            Request::ImageEmbedding(req) => {
                self.image_embedding(req).await.map(Response::Embedding)
            }
            Request::RecognizeText(req) => {
                self.recognize_text(req).await.map(Response::RecognizedText)
            }
        }
    }

    pub async fn text_embedding(
        &self,
        req: TextEmbedRequest,
    ) -> Result<EmbedResponse, HandlerError> {
        let permit = self.acquire().await?;
        self.embedding.text_embedding(req, permit).await
    }

    pub async fn image_embedding(
        &self,
        req: ImageEmbedRequest,
    ) -> Result<EmbedResponse, HandlerError> {
        let permit = self.acquire().await?;
        self.embedding.image_embedding(req, permit).await
    }

    pub async fn recognize_text(
        &self,
        req: RecognizeTextRequest,
    ) -> Result<RecognizeTextResponse, HandlerError> {
        let permit = self.acquire().await?;
        self.recognition.recognize_text(req, permit).await
    }

    async fn acquire(&self) -> Result<OwnedSemaphorePermit, HandlerError> {
        Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|_| HandlerError::inference("Worker pool is shut down"))
    }

    pub fn embedding_dimension(&self) -> usize {
        self.embedding.dimension()
    }

    pub fn embedding_model_name(&self) -> &str {
        self.embedding.model_name()
    }

    pub fn recognition_model_name(&self) -> &str {
        self.recognition.model_name()
    }

    pub fn max_concurrent_requests(&self) -> usize {
        self.max_concurrent_requests
    }

    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }
}
