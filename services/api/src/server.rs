use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_eligibility_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use loan_eligibility::config::AppConfig;
use loan_eligibility::eligibility::{EligibilityService, ModelStore};
use loan_eligibility::error::AppError;
use loan_eligibility::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{error, info};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(model) = args.model.take() {
        config.model.artifact_path = model;
    }

    telemetry::init(&config.telemetry)?;

    // No fallback model: a missing or corrupt artifact stops startup.
    let store = ModelStore::new(config.model.artifact_path.clone());
    let predictor = store.load().map_err(|err| {
        error!(error = %err, "classifier artifact unavailable");
        err
    })?;
    let eligibility_service = Arc::new(EligibilityService::new(predictor));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let app = with_eligibility_routes(eligibility_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        model = %store.path().display(),
        "loan eligibility service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
