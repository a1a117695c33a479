//! HTTP handlers for bounty-service.

pub mod auth;
pub mod bounty;
pub mod health;
pub mod metrics;

use service_core::error::AppError;

/// Unknown routes get the same JSON envelope as every other failure.
pub async fn fallback() -> AppError {
    AppError::NotFound(anyhow::anyhow!("Route not found"))
}
