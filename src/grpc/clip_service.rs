use std::sync::Arc;
use tonic::{Request, Response, Status};

use crate::domain::{ImageEmbedRequest, TextEmbedRequest};
use crate::service::{Operation, ServiceDispatcher};

tonic::include_proto!("clip");

pub struct ClipGrpcService {
    dispatcher: Arc<ServiceDispatcher>,
}

impl ClipGrpcService {
    pub fn new(dispatcher: Arc<ServiceDispatcher>) -> Self {
        Self { dispatcher }
    }
}

#[tonic::async_trait]
impl clip_service_server::ClipService for ClipGrpcService {
    async fn get_text_embedding(
        &self,
        request: Request<TextRequest>,
    ) -> Result<Response<EmbeddingResponse>, Status> {
        let req = request.into_inner();

        let domain_res = self
            .dispatcher
            .text_embedding(TextEmbedRequest { text: req.text })
            .await
            .map_err(|e| e.into_status(Operation::GetTextEmbedding.description()))?;

        Ok(Response::new(EmbeddingResponse {
            embedding: domain_res.embedding,
        }))
    }

    async fn get_image_embedding(
        &self,
        request: Request<ImageRequest>,
    ) -> Result<Response<EmbeddingResponse>, Status> {
        let req = request.into_inner();

        let domain_res = self
            .dispatcher
            .image_embedding(ImageEmbedRequest {
                image_data: req.image_data,
            })
            .await
            .map_err(|e| e.into_status(Operation::GetImageEmbedding.description()))?;

        Ok(Response::new(EmbeddingResponse {
            embedding: domain_res.embedding,
        }))
    }
}
