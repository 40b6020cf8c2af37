// SPDX-License-Identifier: MIT
//
// Unified error types for Varaq.

use thiserror::Error;

/// Top-level error type for all Varaq operations.
#[derive(Debug, Error)]
pub enum VaraqError {
    // -- Camera errors --
    #[error("camera permission denied: {0}")]
    CameraPermission(String),

    #[error("camera unavailable: {0}")]
    CameraUnavailable(String),

    #[error("no active camera stream")]
    NoActiveStream,

    // -- Scan flow errors --
    #[error("operation not valid in stage {stage}: {operation}")]
    StageMismatch {
        stage: &'static str,
        operation: &'static str,
    },

    #[error("no captured frame to process")]
    NoCapturedFrame,

    // -- Document errors --
    #[error("unsupported document type: {0}")]
    UnsupportedDocument(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("export failed: {0}")]
    ExportError(String),

    // -- Collaborators --
    #[error("upload failed: {0}")]
    UploadFailed(String),

    #[error("platform bridge error: {0}")]
    Bridge(String),

    #[error("feature not available on this platform")]
    PlatformUnavailable,

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, VaraqError>;
