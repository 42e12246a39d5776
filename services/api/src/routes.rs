use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use cleanquote::mail::{relay_router, MailTransport};
use cleanquote::quotes::{
    pricing_settings_router, quote_router, PricingSettingsRepository, QuoteService,
};
use serde_json::json;
use std::sync::Arc;

/// Full application router. The relay endpoint is only mounted when this
/// process delivers mail itself.
pub(crate) fn with_quote_routes<R>(
    service: Arc<QuoteService>,
    settings: Arc<R>,
    local_relay: Option<Arc<dyn MailTransport>>,
) -> axum::Router
where
    R: PricingSettingsRepository + 'static,
{
    let mut router = quote_router(service).merge(pricing_settings_router(settings));
    if let Some(transport) = local_relay {
        router = router.merge(relay_router(transport));
    }

    router
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
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
