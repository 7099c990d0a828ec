use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryOpportunityCatalog};
use crate::routes::with_matching_routes;
use avsar::config::AppConfig;
use avsar::error::AppError;
use avsar::matching::MatchingService;
use avsar::telemetry;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    // Starts empty; listings arrive through the catalog import endpoint.
    let catalog = Arc::new(InMemoryOpportunityCatalog::default());
    let matching_service = Arc::new(MatchingService::new(catalog.clone(), config.engine.clone()));

    let app = with_matching_routes(matching_service)
        .layer(Extension(app_state))
        .layer(Extension(catalog))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "eligibility matching service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
