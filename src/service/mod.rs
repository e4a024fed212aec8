// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod dispatcher;
pub mod handler;

pub use dispatcher::{Operation, Request, Response, ServiceDispatcher};
pub use handler::{EmbeddingHandler, RecognitionHandler};
