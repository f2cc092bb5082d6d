use crate::domain::model::{CommandReport, DetectionReport, HealthStatus, ServiceInfo};
use crate::server::extract::{AnySource, UploadSource};
use crate::server::AppState;
use crate::utils::error::{Result, ScanError};
use axum::extract::State;
use axum::Json;

pub const ENDPOINTS: &[&str] = &[
    "GET /",
    "GET /health",
    "POST /detect-codes",
    "POST /detect-codes-stream",
];

/// GET /
pub async fn index() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        endpoints: ENDPOINTS.to_vec(),
    })
}

/// GET /health
pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus { status: "ok" })
}

/// POST /detect-codes
pub async fn detect_codes(
    State(state): State<AppState>,
    AnySource(source): AnySource,
) -> Result<Json<DetectionReport>> {
    let report = state.engine.detect_codes(source).await?;
    Ok(Json(report))
}

/// POST /detect-codes-stream
pub async fn detect_codes_stream(
    State(state): State<AppState>,
    UploadSource(source): UploadSource,
) -> Result<Json<CommandReport>> {
    let report = state.engine.detect_commands(source).await?;
    Ok(Json(report))
}

pub async fn not_found() -> ScanError {
    ScanError::NotFound
}
