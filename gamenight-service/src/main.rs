use gamenight_service::config::GameNightConfig;
use gamenight_service::services::init_metrics;
use gamenight_service::Application;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = GameNightConfig::load()?;

    init_tracing(
        &config.service_name,
        &config.log_level,
        config.otlp_endpoint.as_deref(),
    )?;
    init_metrics()?;

    tracing::info!(environment = ?config.environment, "Starting gamenight-service");

    let application = Application::build(config).await?;
    application.run_until_stopped().await?;

    Ok(())
}
