// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::fmt;
use thiserror::Error;
use tonic::Status;
use tonic::metadata::MetadataValue;

/// Metadata key carrying the [`ErrorKind`] of a failed request.
pub const ERROR_KIND_METADATA_KEY: &str = "x-error-kind";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(#[from] crate::config::ConfigError),

    #[error("Model load error: {0}")]
    ModelLoadError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Tokenization error: {0}")]
    TokenizationError(String),

    #[error("Preprocessing error: {0}")]
    PreprocessingError(String),

    #[error("Inference error: {0}")]
    InferenceError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::InvalidInput(_) => ErrorKind::InputError,
            AppError::TokenizationError(_) | AppError::PreprocessingError(_) => {
                ErrorKind::PreprocessingError
            }
            // Startup-only failures are never the client's fault.
            AppError::InferenceError(_)
            | AppError::ModelLoadError(_)
            | AppError::ConfigError(_)
            | AppError::IoError(_) => ErrorKind::InferenceError,
        }
    }
}

impl From<candle_core::Error> for AppError {
    fn from(e: candle_core::Error) -> Self {
        AppError::InferenceError(e.to_string())
    }
}

/// Failure classification surfaced to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or undecodable client payload.
    InputError,
    /// Input decoded but could not be turned into model-ready tensors.
    PreprocessingError,
    /// The model runtime itself failed.
    InferenceError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InputError => "input_error",
            ErrorKind::PreprocessingError => "preprocessing_error",
            ErrorKind::InferenceError => "inference_error",
        }
    }

    /// Only runtime failures may succeed on a second attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::InferenceError)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::InputError => write!(f, "InputError"),
            ErrorKind::PreprocessingError => write!(f, "PreprocessingError"),
            ErrorKind::InferenceError => write!(f, "InferenceError"),
        }
    }
}

/// Structured failure outcome produced at the request handler boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("[{kind}] {message}")]
pub struct HandlerError {
    pub kind: ErrorKind,
    pub message: String,
}

impl HandlerError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn input(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InputError, message)
    }

    pub fn inference(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InferenceError, message)
    }

    /// Classifies a blocking inference task that panicked or was cancelled.
    pub fn from_join_error(e: tokio::task::JoinError) -> Self {
        if e.is_panic() {
            Self::inference(format!("inference task panicked: {}", e))
        } else {
            Self::inference(format!("inference task cancelled: {}", e))
        }
    }

    /// Converts into an `INTERNAL` status; the kind travels in the message and
    /// in the `x-error-kind` metadata entry.
    pub fn into_status(self, context: &str) -> Status {
        let mut status = Status::internal(format!(
            "{} failed [{}]: {}",
            context, self.kind, self.message
        ));
        status.metadata_mut().insert(
            ERROR_KIND_METADATA_KEY,
            MetadataValue::from_static(self.kind.as_str()),
        );
        status
    }
}

impl From<AppError> for HandlerError {
    fn from(e: AppError) -> Self {
        Self::new(e.kind(), e.to_string())
    }
}
