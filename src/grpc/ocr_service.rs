use std::sync::Arc;
use tonic::{Request, Response, Status};

use crate::domain::RecognizeTextRequest as DomainRecognizeTextRequest;
use crate::service::{Operation, ServiceDispatcher};

tonic::include_proto!("ocr");

pub struct OcrGrpcService {
    dispatcher: Arc<ServiceDispatcher>,
}

impl OcrGrpcService {
    pub fn new(dispatcher: Arc<ServiceDispatcher>) -> Self {
        Self { dispatcher }
    }
}

#[tonic::async_trait]
impl ocr_service_server::OcrService for OcrGrpcService {
    async fn recognize_text(
        &self,
        request: Request<RecognizeTextRequest>,
    ) -> Result<Response<RecognizeTextResponse>, Status> {
        let req = request.into_inner();

        let domain_res = self
            .dispatcher
            .recognize_text(DomainRecognizeTextRequest {
                image_data: req.image_data,
            })
            .await
            .map_err(|e| e.into_status(Operation::RecognizeText.description()))?;

        Ok(Response::new(RecognizeTextResponse {
            recognized_text: domain_res.recognized_text,
        }))
    }
}
