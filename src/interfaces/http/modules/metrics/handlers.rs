//! Prometheus metrics handler
//!
//! Exposes `GET /metrics` in Prometheus text format, rendered from the
//! process-wide `metrics-exporter-prometheus` recorder. Besides the HTTP
//! series this includes `roster_membership_changes_total{action}`.

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use metrics_exporter_prometheus::PrometheusHandle;

/// Shared state for the metrics endpoint
#[derive(Clone)]
pub struct MetricsState {
    pub handle: PrometheusHandle,
}

#[utoipa::path(
    get,
    path = "/metrics",
    tag = "Health",
    responses((status = 200, description = "Prometheus text exposition", body = String))
)]
pub async fn prometheus_metrics(State(state): State<MetricsState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
        state.handle.render(),
    )
}
