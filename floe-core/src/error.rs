// floe-core/src/error.rs

use crate::domain::error::DomainError;
use crate::infrastructure::error::InfrastructureError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FloeError {
    // --- DOMAIN (policy types, scoring config, merge conflicts) ---
    #[error(transparent)]
    Domain(#[from] DomainError),

    // --- INFRASTRUCTURE (IO, parsing, catalog) ---
    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),

    // --- APPLICATION ---
    #[error("Internal Error: {0}")]
    InternalError(String),

    #[error("Collaborator unavailable: {0}")]
    Unavailable(String),
}

impl From<std::io::Error> for FloeError {
    fn from(err: std::io::Error) -> Self {
        FloeError::Infrastructure(InfrastructureError::Io(err))
    }
}
