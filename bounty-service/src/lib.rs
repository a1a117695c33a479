pub mod config;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;
pub mod utils;

use axum::{
    http::{header, HeaderName, HeaderValue, Method, Request},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Json, Router,
};
use service_core::middleware::{
    request_id_middleware, request_timeout_middleware, security_headers_middleware,
    REQUEST_ID_HEADER,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::BountyConfig;
use crate::middleware::metrics_middleware;
use crate::services::{AuthService, BountyService, BountyStore, HunterStore, StoreHealth};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::bounty::list_bounties,
        handlers::bounty::get_bounty,
        handlers::bounty::list_bounties_by_threat_level,
        handlers::bounty::create_bounty,
    ),
    components(
        schemas(
            dtos::RegisterRequest,
            dtos::LoginRequest,
            dtos::AuthResponse,
            dtos::CreateBountyRequest,
            dtos::BountyResponse,
            dtos::BountyListResponse,
            dtos::ErrorResponse,
            models::Bounty,
            models::HunterResponse,
            models::ThreatLevel,
        )
    ),
    tags(
        (name = "Authentication", description = "Hunter registration and login"),
        (name = "Bounties", description = "Wanted-person listings"),
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub config: BountyConfig,
    pub auth_service: AuthService,
    pub bounty_service: BountyService,
    pub store_health: Arc<dyn StoreHealth>,
}

impl AppState {
    /// Wire both services to one store.
    pub fn new<S>(config: BountyConfig, store: Arc<S>) -> Self
    where
        S: HunterStore + BountyStore + StoreHealth + 'static,
    {
        Self {
            config,
            auth_service: AuthService::new(store.clone()),
            bounty_service: BountyService::new(store.clone()),
            store_health: store,
        }
    }
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let allow_origin = if allowed_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(allowed_origins.iter().filter_map(|o| {
            o.parse::<HeaderValue>()
                .map_err(|e| tracing::error!("Invalid CORS origin '{}': {}. Skipping.", o, e))
                .ok()
        }))
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        .expose_headers([header::LOCATION, HeaderName::from_static(REQUEST_ID_HEADER)])
}

pub fn build_router(state: AppState) -> Router {
    let mut app = Router::new();

    if state.config.swagger.enabled {
        app = app.merge(SwaggerUi::new("/docs").url("/.well-known/openapi.json", ApiDoc::openapi()));
    } else {
        app = app.route(
            "/.well-known/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        );
    }

    let request_timeout = state.config.server.request_timeout();
    let cors = cors_layer(&state.config.security.allowed_origins);

    app
        // Authentication routes
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login))
        // Bounty routes
        .route(
            "/api/bounty",
            get(handlers::bounty::list_bounties).post(handlers::bounty::create_bounty),
        )
        .route(
            "/api/bounty/threat-level/:level",
            get(handlers::bounty::list_bounties_by_threat_level),
        )
        .route("/api/bounty/:id", get(handlers::bounty::get_bounty))
        // Observability
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .route("/metrics", get(handlers::metrics::metrics))
        .fallback(handlers::fallback)
        .with_state(state)
        .layer(from_fn_with_state(request_timeout, request_timeout_middleware))
        .layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
            let request_id = request
                .headers()
                .get(REQUEST_ID_HEADER)
                .and_then(|value| value.to_str().ok())
                .unwrap_or("-");

            tracing::info_span!(
                "http_request",
                request_id = %request_id,
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        }))
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(cors)
}
