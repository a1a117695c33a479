use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use service_core::error::AppError;

use crate::{
    dtos::{AuthResponse, ErrorResponse, LoginRequest, RegisterRequest},
    utils::{Password, ValidatedJson},
    AppState,
};

/// Register a new hunter
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Hunter registered", body = AuthResponse),
        (status = 400, description = "Invalid input or email already registered", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let password = Password::new(req.password);
    let hunter = state
        .auth_service
        .register(&req.name, &req.email, &password)
        .await?;

    Ok((
        StatusCode::OK,
        Json(AuthResponse::new("Hunter registered successfully", hunter)),
    ))
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Invalid email or password", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let password = Password::new(req.password);
    let hunter = state.auth_service.login(&req.email, &password).await?;

    Ok((StatusCode::OK, Json(AuthResponse::new("Login successful", hunter))))
}
