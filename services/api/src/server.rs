use crate::cli::ServeArgs;
use crate::infra::{AppState, GymServices};
use crate::routes::with_gym_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use gym_desk::config::AppConfig;
use gym_desk::error::AppError;
use gym_desk::telemetry;
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

    let services = GymServices::in_memory(config.membership.clone());
    let app = with_gym_routes(&services)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        staff_domain = config.membership.staff_email_domain.as_deref().unwrap_or("none"),
        "gym desk ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
