use crate::cli::ServeArgs;
use crate::infra::{load_dataset, AppState};
use crate::routes::risk_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use pandemic_risk::config::AppConfig;
use pandemic_risk::data::SnapshotStore;
use pandemic_risk::error::AppError;
use pandemic_risk::scoring::RiskEngine;
use pandemic_risk::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
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
    if let Some(dir) = args.data_dir.take() {
        config.data.dir = dir;
    }

    telemetry::init(&config.telemetry)?;

    let engine = RiskEngine::new(config.scoring)?;
    let dataset = load_dataset(config.data.dir.clone()).await?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        snapshot: Arc::new(SnapshotStore::new(dataset)),
        engine: Arc::new(engine),
        data_dir: Arc::new(config.data.dir.clone()),
    };

    let app = risk_routes()
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        data_dir = %config.data.dir.display(),
        "pandemic risk service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
