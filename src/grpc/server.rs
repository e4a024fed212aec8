use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tonic::transport::Server;

use super::clip_service::ClipGrpcService;
use super::clip_service::clip_service_server::ClipServiceServer;
use super::ocr_service::OcrGrpcService;
use super::ocr_service::ocr_service_server::OcrServiceServer;
use crate::error::AppError;
use crate::service::ServiceDispatcher;

pub struct GrpcServer {
    addr: SocketAddr,
    dispatcher: Arc<ServiceDispatcher>,
}

impl GrpcServer {
    pub fn new(addr: SocketAddr, dispatcher: Arc<ServiceDispatcher>) -> Self {
        Self { addr, dispatcher }
    }

    /// Serves both services until `shutdown` resolves, then drains in-flight
    /// requests.
    pub async fn run_until<F>(self, shutdown: F) -> Result<(), AppError>
    where
        F: Future<Output = ()> + Send,
    {
        let clip_service = ClipGrpcService::new(self.dispatcher.clone());
        let ocr_service = OcrGrpcService::new(self.dispatcher.clone());

        tracing::info!("Starting gRPC server on {}", self.addr);

        Server::builder()
            .add_service(ClipServiceServer::new(clip_service))
            .add_service(OcrServiceServer::new(ocr_service))
            .serve_with_shutdown(self.addr, shutdown)
            .await
            .map_err(|e| {
                AppError::IoError(std::io::Error::other(format!("gRPC server error: {}", e)))
            })?;

        tracing::info!("gRPC server stopped");
        Ok(())
    }
}
