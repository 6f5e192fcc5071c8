//! Registry error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("credential already exists: {0}")]
    AlreadyExists(String),

    #[error("credential not found: {0}")]
    NotFound(String),

    #[error("failed to load shared AWS config: {0}")]
    SharedConfig(String),
}
