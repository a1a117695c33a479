use service_core::error::AppError;
use thiserror::Error;

use crate::services::store::StoreError;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Bounty not found")]
    NotFound,

    #[error("Hunter with this email already exists")]
    DuplicateEmail,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("{0}")]
    ValidationFailed(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound => AppError::NotFound(anyhow::anyhow!("Bounty not found")),
            ServiceError::DuplicateEmail => {
                AppError::BadRequest(anyhow::anyhow!("Hunter with this email already exists"))
            }
            ServiceError::InvalidCredentials => {
                AppError::Unauthorized(anyhow::anyhow!("Invalid email or password"))
            }
            ServiceError::ValidationFailed(msg) => AppError::BadRequest(anyhow::anyhow!(msg)),
            ServiceError::Storage(e) => AppError::DatabaseError(anyhow::Error::new(e)),
        }
    }
}
