//! Connection error types.

use std::time::Duration;

use thiserror::Error;

/// Failure reported by a validation probe.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The service rejected the credential/region combination.
    #[error("credentials rejected: {0}")]
    Rejected(String),

    /// The call could not be completed (network, endpoint, credential chain).
    #[error("AWS SDK error: {0}")]
    AwsSdk(String),

    /// The probe task panicked or was cancelled.
    #[error("probe task failed: {0}")]
    Task(String),
}

/// Failure decoding a persisted selection document.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("malformed selection document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("selection document must be a JSON object, found {0}")]
    NotAnObject(&'static str),
}

#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("connection state did not settle within {0:?}")]
    WaitTimeout(Duration),

    #[error("state file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Codec(#[from] CodecError),
}
