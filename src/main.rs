// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::Context;
use clipocr::{
    AppConfig, ClipEmbedder, EmbeddingModel, RecognitionModel, ServiceDispatcher,
    TrOcrRecognizer, grpc::GrpcServer,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn init_tracing(config: &AppConfig) {
    let default_level = config
        .monitoring
        .log_level
        .clone()
        .unwrap_or_else(|| "info".to_string());
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received Ctrl-C, shutting down"),
        Err(e) => tracing::error!("Failed to listen for Ctrl-C: {}", e),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    init_tracing(&config);
    tracing::info!("Starting clipocr inference service...");
    tracing::debug!("Configuration loaded: {:?}", config);

    tracing::info!("Initializing models (this may take a while to download weights)...");
    let embedding_config = config.embedding.clone();
    let recognition_config = config.recognition.clone();
    let (embedder, recognizer) = tokio::try_join!(
        tokio::task::spawn_blocking(move || ClipEmbedder::load(&embedding_config)),
        tokio::task::spawn_blocking(move || TrOcrRecognizer::load(&recognition_config)),
    )?;
    let embedder: Arc<dyn EmbeddingModel> = Arc::new(embedder.context("failed to load CLIP")?);
    let recognizer: Arc<dyn RecognitionModel> =
        Arc::new(recognizer.context("failed to load TrOCR")?);

    let dispatcher = Arc::new(ServiceDispatcher::from_config(embedder, recognizer, &config));
    tracing::info!(
        "Models ready: {} (dimension {}), {}; up to {} concurrent requests",
        dispatcher.embedding_model_name(),
        dispatcher.embedding_dimension(),
        dispatcher.recognition_model_name(),
        dispatcher.max_concurrent_requests()
    );

    let addr: SocketAddr = config
        .server
        .bind_address()
        .parse()
        .with_context(|| format!("invalid bind address {}", config.server.bind_address()))?;

    GrpcServer::new(addr, dispatcher)
        .run_until(shutdown_signal())
        .await?;

    Ok(())
}
