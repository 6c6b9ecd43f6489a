//! Error types for q2lsp.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the outer layers (config, signature loading, server).
///
/// The validation core never returns these for user mistakes; those become
/// diagnostics instead.
#[derive(Debug, Error)]
pub enum Q2Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("missing configuration: {0}")]
    MissingConfig(String),

    #[error("invalid signature data: {0}")]
    InvalidSignature(String),

    #[error("signature cache not found: {}", .0.display())]
    SignaturesNotFound(PathBuf),

    #[error("validation failed: {0}")]
    ValidationFailed(String),
}

pub type Result<T> = std::result::Result<T, Q2Error>;
