pub mod auth;
pub mod bounty;

use serde::Serialize;
use utoipa::ToSchema;

/// Failure envelope, as rendered by `service_core::error::AppError`.
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = false)]
    pub success: bool,
    #[schema(example = "Bounty not found")]
    pub message: String,
    /// Per-field messages, present only for validation failures.
    pub details: Option<Vec<String>>,
}

pub use auth::{AuthResponse, LoginRequest, RegisterRequest};
pub use bounty::{BountyListResponse, BountyResponse, CreateBountyRequest};
