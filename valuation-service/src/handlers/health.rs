use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use service_core::error::AppError;

/// Liveness probe.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "valuation-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness probe: ready only when report generation can actually run.
pub async fn readiness_check(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    let provider = state
        .valuation
        .provider()
        .ok_or_else(|| AppError::ServiceUnavailable("GOOGLE_API_KEY missing".to_string()))?;

    // A configured provider still gets the final say.
    provider
        .health_check()
        .await
        .map_err(|e| AppError::ServiceUnavailable(e.to_string()))?;

    Ok(StatusCode::OK)
}

/// Prometheus scrape endpoint.
pub async fn prometheus_metrics(State(state): State<AppState>) -> Result<String, AppError> {
    state
        .metrics
        .as_ref()
        .map(|handle| handle.render())
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("metrics recorder not installed")))
}
