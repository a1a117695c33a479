use bounty_service::{config::BountyConfig, startup::Application};
use service_core::error::AppError;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = BountyConfig::from_env()?;

    init_tracing(
        &config.service_name,
        &config.log_level,
        config.otlp_endpoint.as_deref(),
    );

    let service_span = tracing::info_span!(
        "service",
        name = %config.service_name,
        version = %config.service_version,
        environment = ?config.environment,
    );
    let _guard = service_span.enter();

    if config.exposes_docs_in_prod() {
        tracing::warn!("Swagger UI is publicly accessible in production");
    }

    tracing::info!(
        port = config.common.port,
        swagger = config.swagger.enabled,
        "Starting bounty-service"
    );

    let application = Application::build(config).await?;
    application.run_until_stopped().await?;

    Ok(())
}
