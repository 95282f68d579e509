use metrics_exporter_prometheus::PrometheusBuilder;
use service_core::observability::init_tracing;
use valuation_service::config::ValuationConfig;
use valuation_service::startup::Application;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ValuationConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        "valuation-service",
        "info",
        config.observability.otlp_endpoint.as_deref(),
    );

    let metrics = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| tracing::warn!("Metrics recorder not installed: {}", e))
        .ok();

    let app = Application::build(config, metrics).await.map_err(|e| {
        tracing::error!("Failed to build application: {}", e);
        anyhow::anyhow!("Startup error: {}", e)
    })?;

    app.run_until_stopped().await?;

    Ok(())
}
