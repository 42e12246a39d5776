use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::json;
use tracing::error;

use super::domain::QuoteSubmission;
use super::service::{QuoteService, QuoteServiceError};
use crate::error::AppError;

/// Router builder exposing quote submission and estimation.
pub fn quote_router(service: Arc<QuoteService>) -> Router {
    Router::new()
        .route("/api/v1/quotes", post(submit_handler))
        .route("/api/v1/quotes/estimate", post(estimate_handler))
        .with_state(service)
}

pub(crate) async fn submit_handler(
    State(service): State<Arc<QuoteService>>,
    Json(submission): Json<QuoteSubmission>,
) -> Response {
    match service.submit_quote(submission).await {
        Ok(receipt) => (StatusCode::OK, Json(receipt)).into_response(),
        Err(QuoteServiceError::InvalidInput(error)) => AppError::from(error).into_response(),
        Err(QuoteServiceError::Notification { breakdown, error }) => {
            error!(error = %error, "quote confirmation emails not delivered");
            let payload = json!({
                "error": "Your quote was calculated, but the confirmation emails could not be sent.",
                "breakdown": breakdown,
                "failedNotifications": error.failed_kinds(),
                "transportUnavailable": error.transport_unavailable(),
            });
            (StatusCode::BAD_GATEWAY, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn estimate_handler(
    State(service): State<Arc<QuoteService>>,
    Json(submission): Json<QuoteSubmission>,
) -> Result<Json<serde_json::Value>, AppError> {
    let breakdown = service.estimate(submission)?;
    Ok(Json(json!({ "breakdown": breakdown })))
}
