//! HTTP relay endpoint: accepts `{to, subject, text}` and hands it to the
//! process's own transport.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use super::{MailTransport, OutboundEmail};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RelayRequest {
    to: Option<String>,
    subject: Option<String>,
    text: Option<String>,
}

impl RelayRequest {
    /// `None` when any field is absent, null, or blank.
    fn into_email(self) -> Option<OutboundEmail> {
        let present = |field: Option<String>| field.filter(|value| !value.trim().is_empty());
        Some(OutboundEmail {
            to: present(self.to)?,
            subject: present(self.subject)?,
            text: present(self.text)?,
        })
    }
}

pub fn relay_router(transport: Arc<dyn MailTransport>) -> Router {
    Router::new()
        .route("/api/send-email", post(send_email_handler))
        .with_state(transport)
}

pub(crate) async fn send_email_handler(
    State(transport): State<Arc<dyn MailTransport>>,
    Json(request): Json<RelayRequest>,
) -> Response {
    let Some(email) = request.into_email() else {
        let payload = json!({ "message": "Missing required fields" });
        return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
    };

    match transport.send(&email).await {
        Ok(()) => {
            info!(to = %email.to, transport = transport.name(), "relayed email");
            let payload = json!({ "message": "Email sent successfully" });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => {
            error!(to = %email.to, error = %err, "relay delivery failed");
            let payload = json!({ "message": format!("Failed to send email: {err}") });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
