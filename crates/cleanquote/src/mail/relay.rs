use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::debug;

use super::{MailTransport, OutboundEmail, TransportError};

/// Posts each message as JSON to an HTTP mail relay.
///
/// Any 2xx status counts as delivered. Other statuses are surfaced as
/// [`TransportError::Rejected`] with the relay's `message` field when present;
/// connection failures and timeouts become [`TransportError::Unavailable`].
#[derive(Debug, Clone)]
pub struct HttpRelayTransport {
    client: Client,
    endpoint: Url,
}

#[derive(Debug, Deserialize)]
struct RelayReply {
    message: Option<String>,
}

impl HttpRelayTransport {
    pub fn new(endpoint: impl AsRef<str>, timeout: Duration) -> Result<Self, TransportError> {
        let endpoint = endpoint.as_ref();
        let endpoint = Url::parse(endpoint).map_err(|err| {
            TransportError::Misconfigured(format!("invalid relay endpoint '{endpoint}': {err}"))
        })?;
        let client = Client::builder().timeout(timeout).build().map_err(|err| {
            TransportError::Misconfigured(format!("failed to create HTTP client: {err}"))
        })?;

        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl MailTransport for HttpRelayTransport {
    fn name(&self) -> &'static str {
        "relay"
    }

    async fn send(&self, email: &OutboundEmail) -> Result<(), TransportError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(email)
            .send()
            .await
            .map_err(|err| TransportError::Unavailable(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            debug!(endpoint = %self.endpoint, status = status.as_u16(), "relay accepted message");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        let reason = serde_json::from_str::<RelayReply>(&body)
            .ok()
            .and_then(|reply| reply.message)
            .unwrap_or(body);

        Err(TransportError::Rejected(format!(
            "relay responded {}: {}",
            status.as_u16(),
            reason.trim()
        )))
    }
}
