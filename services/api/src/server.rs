use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryPricingSettingsRepository};
use crate::routes::with_quote_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use cleanquote::config::AppConfig;
use cleanquote::error::AppError;
use cleanquote::mail::transport_from_config;
use cleanquote::quotes::{NotificationDispatcher, QuoteService};
use cleanquote::telemetry;
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

    let transport = transport_from_config(&config.mail)?;
    let dispatcher = NotificationDispatcher::new(transport.clone(), config.mail.admin_address.clone());
    let quote_service = Arc::new(QuoteService::new(dispatcher));
    let settings = Arc::new(InMemoryPricingSettingsRepository::default());
    let local_relay = config.mail.backend.delivers_locally().then_some(transport);

    let app = with_quote_routes(quote_service, settings, local_relay)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        mail_backend = config.mail.backend.label(),
        "cleanquote service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
