//! Application startup and lifecycle management.

use crate::config::ValuationConfig;
use crate::handlers::{
    health::{health_check, prometheus_metrics, readiness_check},
    valuation::{index, submit},
};
use crate::services::providers::gemini::{GeminiConfig, GeminiTextProvider};
use crate::services::providers::{GenerationParams, TextProvider};
use crate::services::{RenderMode, ValuationService};
use axum::{middleware::from_fn, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware, security_headers::security_headers_middleware,
    tracing::request_id_middleware,
};
use service_core::observability::REQUEST_ID_HEADER;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub valuation: ValuationService,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Wire the Gemini provider from configuration. Without a credential the
    /// provider is left out and submissions report the missing key.
    pub fn from_config(config: &ValuationConfig) -> Result<Self, AppError> {
        let provider: Option<Arc<dyn TextProvider>> = match &config.google.api_key {
            Some(api_key) => {
                let provider = GeminiTextProvider::new(GeminiConfig {
                    api_key: api_key.clone(),
                    model: config.models.text_model.clone(),
                    api_base: config.google.api_base.clone(),
                    timeout: Duration::from_secs(config.google.request_timeout_secs),
                })
                .map_err(|e| AppError::ConfigError(anyhow::Error::new(e)))?;

                tracing::info!(model = %provider.model(), "Initialized Gemini text provider");
                Some(Arc::new(provider) as Arc<dyn TextProvider>)
            }
            None => {
                tracing::warn!("GOOGLE_API_KEY not set; report generation is disabled");
                None
            }
        };

        Ok(Self::with_provider(config, provider))
    }

    /// Build state around an explicit provider (tests use the mock).
    pub fn with_provider(config: &ValuationConfig, provider: Option<Arc<dyn TextProvider>>) -> Self {
        let params = GenerationParams {
            temperature: config.models.temperature,
            max_tokens: config.models.max_output_tokens,
        };
        let valuation = ValuationService::new(
            provider,
            params,
            RenderMode::from_flag(config.report.render_markdown),
        );

        Self {
            valuation,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index).post(submit))
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(prometheus_metrics))
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
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
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the given configuration.
    ///
    /// Port 0 binds a random port (used by tests).
    pub async fn build(
        config: ValuationConfig,
        metrics: Option<PrometheusHandle>,
    ) -> Result<Self, AppError> {
        let address = config.common.address();
        let mut state = AppState::from_config(&config)?;
        if let Some(handle) = metrics {
            state = state.with_metrics(handle);
        }

        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", address, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Valuation service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            router: build_router(state),
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until a shutdown signal arrives.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                e
            })
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
