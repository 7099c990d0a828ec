use crate::infra::{AppState, InMemoryOpportunityCatalog};
use avsar::error::AppError;
use avsar::ingest::OpportunityCsvImporter;
use avsar::matching::{matching_router, MatchingService};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;
use tracing::info;

pub(crate) fn with_matching_routes(
    service: Arc<MatchingService<InMemoryOpportunityCatalog>>,
) -> axum::Router {
    matching_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/catalog/import",
            axum::routing::post(catalog_import_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[derive(Debug, Deserialize)]
pub(crate) struct CatalogImportRequest {
    /// CSV export from the opportunity collaborator.
    pub(crate) csv: String,
    /// Replace the whole catalog instead of merging into it.
    #[serde(default)]
    pub(crate) replace: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct CatalogImportResponse {
    pub(crate) imported: usize,
    pub(crate) skipped: usize,
    pub(crate) catalog_size: usize,
}

pub(crate) async fn catalog_import_endpoint(
    Extension(catalog): Extension<Arc<InMemoryOpportunityCatalog>>,
    Json(payload): Json<CatalogImportRequest>,
) -> Result<Json<CatalogImportResponse>, AppError> {
    let reader = Cursor::new(payload.csv.into_bytes());
    let import = OpportunityCsvImporter::from_reader(reader)?;
    let imported = import.opportunities.len();

    let catalog_size = if payload.replace {
        catalog.replace_all(import.opportunities)
    } else {
        catalog.extend(import.opportunities)
    };

    info!(imported, skipped = import.skipped, catalog_size, "catalog import applied");

    Ok(Json(CatalogImportResponse {
        imported,
        skipped: import.skipped,
        catalog_size,
    }))
}
