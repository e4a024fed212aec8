// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::dispatcher::Operation;
use crate::config::ImageConfig;
use crate::domain::{
    EmbedResponse, ImageEmbedRequest, RecognizeTextRequest, RecognizeTextResponse,
    TextEmbedRequest,
};
use crate::engine::{EmbeddingModel, RecognitionModel};
use crate::error::{AppError, HandlerError};
use crate::vision::decode_image_with_limits;
use std::sync::Arc;
use tokio::sync::OwnedSemaphorePermit;
use tracing::{debug, warn};

/// Runs `task` on the blocking pool and classifies whatever goes wrong,
/// including a panic inside the model.
///
/// The permit lives inside the blocking task, so it is returned only when the
/// work ends, even if the caller's future is dropped first.
async fn run_blocking<T, F>(
    operation: Operation,
    permit: OwnedSemaphorePermit,
    task: F,
) -> Result<T, HandlerError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    let work = move || {
        let _permit = permit;
        task()
    };
    let error = match tokio::task::spawn_blocking(work).await {
        Ok(Ok(value)) => return Ok(value),
        Ok(Err(e)) => HandlerError::from(e),
        Err(join_error) => HandlerError::from_join_error(join_error),
    };
    Err(log_failure(operation, error))
}

fn log_failure(operation: Operation, error: HandlerError) -> HandlerError {
    warn!(
        operation = %operation,
        kind = %error.kind,
        "Request failed: {}",
        error.message
    );
    error
}

fn require_image_bytes(operation: Operation, image_data: &[u8]) -> Result<(), HandlerError> {
    if image_data.is_empty() {
        return Err(log_failure(
            operation,
            HandlerError::input("Image payload is empty"),
        ));
    }
    Ok(())
}

#[derive(Clone)]
pub struct EmbeddingHandler {
    model: Arc<dyn EmbeddingModel>,
    limits: ImageConfig,
}

impl EmbeddingHandler {
    pub fn new(model: Arc<dyn EmbeddingModel>, limits: ImageConfig) -> Self {
        Self { model, limits }
    }

    pub fn dimension(&self) -> usize {
        self.model.dimension()
    }

    pub fn model_name(&self) -> &str {
        self.model.model_name()
    }

    /// Any string is accepted, the empty one included.
    pub async fn text_embedding(
        &self,
        req: TextEmbedRequest,
        permit: OwnedSemaphorePermit,
    ) -> Result<EmbedResponse, HandlerError> {
        let model = Arc::clone(&self.model);
        debug!("Embedding text of {} bytes", req.text.len());

        let embedding = run_blocking(Operation::GetTextEmbedding, permit, move || {
            model.embed_text(&req.text)
        })
        .await?;

        Ok(EmbedResponse { embedding })
    }

    pub async fn image_embedding(
        &self,
        req: ImageEmbedRequest,
        permit: OwnedSemaphorePermit,
    ) -> Result<EmbedResponse, HandlerError> {
        require_image_bytes(Operation::GetImageEmbedding, &req.image_data)?;

        let model = Arc::clone(&self.model);
        let limits = self.limits;
        let embedding = run_blocking(Operation::GetImageEmbedding, permit, move || {
            let image = decode_image_with_limits(&req.image_data, &limits)?;
            model.embed_image(&image)
        })
        .await?;

        Ok(EmbedResponse { embedding })
    }
}

#[derive(Clone)]
pub struct RecognitionHandler {
    model: Arc<dyn RecognitionModel>,
    limits: ImageConfig,
}

impl RecognitionHandler {
    pub fn new(model: Arc<dyn RecognitionModel>, limits: ImageConfig) -> Self {
        Self { model, limits }
    }

    pub fn model_name(&self) -> &str {
        self.model.model_name()
    }

    /// An image without text yields an empty string, not an error.
    pub async fn recognize_text(
        &self,
        req: RecognizeTextRequest,
        permit: OwnedSemaphorePermit,
    ) -> Result<RecognizeTextResponse, HandlerError> {
        require_image_bytes(Operation::RecognizeText, &req.image_data)?;

        let model = Arc::clone(&self.model);
        let limits = self.limits;
        let recognized_text = run_blocking(Operation::RecognizeText, permit, move || {
            let image = decode_image_with_limits(&req.image_data, &limits)?;
            model.recognize(&image)
        })
        .await?;

        debug!("Recognized {} characters", recognized_text.chars().count());
        Ok(RecognizeTextResponse { recognized_text })
    }
}
