// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod clip_service;
pub mod ocr_service;
pub mod server;

pub use clip_service::ClipGrpcService;
pub use ocr_service::OcrGrpcService;
pub use server::GrpcServer;
