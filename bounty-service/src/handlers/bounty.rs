use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;

use crate::{
    dtos::{BountyListResponse, BountyResponse, CreateBountyRequest, ErrorResponse},
    models::ThreatLevel,
    utils::ValidatedJson,
    AppState,
};

fn parse_bounty_id(raw: &str) -> Result<i32, AppError> {
    raw.parse::<i32>()
        .map_err(|_| AppError::BadRequest(anyhow::anyhow!("Bounty id must be an integer")))
}

/// List active bounties, newest sighting first
#[utoipa::path(
    get,
    path = "/api/bounty",
    responses(
        (status = 200, description = "Active bounties", body = BountyListResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Bounties"
)]
pub async fn list_bounties(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let bounties = state.bounty_service.list_active().await?;
    Ok(Json(BountyListResponse::new("Bounties retrieved", bounties)))
}

/// Get a bounty by id, including inactive ones
#[utoipa::path(
    get,
    path = "/api/bounty/{id}",
    params(("id" = i32, Path, description = "Bounty id")),
    responses(
        (status = 200, description = "Bounty found", body = BountyResponse),
        (status = 400, description = "Id is not an integer", body = ErrorResponse),
        (status = 404, description = "Bounty not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Bounties"
)]
pub async fn get_bounty(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_bounty_id(&id)?;
    let bounty = state.bounty_service.get_by_id(id).await?;
    Ok(Json(BountyResponse::new("Bounty retrieved", bounty)))
}

/// List active bounties at one threat level
#[utoipa::path(
    get,
    path = "/api/bounty/threat-level/{level}",
    params(("level" = String, Path, description = "Low, Medium, High or Critical (any case)")),
    responses(
        (status = 200, description = "Matching bounties", body = BountyListResponse),
        (status = 400, description = "Unknown threat level", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Bounties"
)]
pub async fn list_bounties_by_threat_level(
    State(state): State<AppState>,
    Path(level): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let level: ThreatLevel = level
        .parse()
        .map_err(|e: String| AppError::BadRequest(anyhow::anyhow!(e)))?;
    let bounties = state.bounty_service.list_by_threat_level(level).await?;
    Ok(Json(BountyListResponse::new("Bounties retrieved", bounties)))
}

/// Create a bounty
#[utoipa::path(
    post,
    path = "/api/bounty",
    request_body = CreateBountyRequest,
    responses(
        (status = 201, description = "Bounty created", body = BountyResponse,
            headers(("Location" = String, description = "Path of the new bounty"))),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Bounties"
)]
pub async fn create_bounty(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateBountyRequest>,
) -> Result<impl IntoResponse, AppError> {
    let input = req
        .into_new_bounty()
        .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("Spotted date is required")))?;
    let bounty = state.bounty_service.create(input).await?;
    let location = format!("/api/bounty/{}", bounty.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(BountyResponse::new("Bounty created", bounty)),
    ))
}
