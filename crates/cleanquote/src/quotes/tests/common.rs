use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::mail::{MailTransport, OutboundEmail, TransportError};
use crate::quotes::domain::QuoteSubmission;
use crate::quotes::notification::NotificationDispatcher;
use crate::quotes::service::QuoteService;
use crate::quotes::settings::{PricingSettings, PricingSettingsError, PricingSettingsRepository};

pub(super) const ADMIN_ADDRESS: &str = "admin@cleanquote.com";
pub(super) const CUSTOMER_ADDRESS: &str = "facilities@acme.test";

pub(super) fn submission() -> QuoteSubmission {
    QuoteSubmission {
        client_name: "Acme Corp".to_string(),
        email: CUSTOMER_ADDRESS.to_string(),
        address: "123 Main St".to_string(),
        city: "Queens".to_string(),
        property_size: 5000.0,
        cleaning_type: "basic".to_string(),
        service_frequency: "weekly".to_string(),
        additional_services: Some(vec!["windows".to_string()]),
    }
}

/// Transport whose outcome and latency are scripted per recipient.
#[derive(Default)]
pub(super) struct ScriptedTransport {
    failures: HashMap<String, TransportError>,
    delays: HashMap<String, Duration>,
    attempts: Mutex<Vec<String>>,
    delivered: Mutex<Vec<OutboundEmail>>,
}

impl ScriptedTransport {
    pub(super) fn failing(mut self, recipient: &str, error: TransportError) -> Self {
        self.failures.insert(recipient.to_string(), error);
        self
    }

    pub(super) fn delayed(mut self, recipient: &str, delay: Duration) -> Self {
        self.delays.insert(recipient.to_string(), delay);
        self
    }

    pub(super) fn attempts(&self) -> Vec<String> {
        self.attempts.lock().expect("attempt mutex").clone()
    }

    pub(super) fn delivered(&self) -> Vec<OutboundEmail> {
        self.delivered.lock().expect("delivery mutex").clone()
    }
}

#[async_trait]
impl MailTransport for ScriptedTransport {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn send(&self, email: &OutboundEmail) -> Result<(), TransportError> {
        self.attempts
            .lock()
            .expect("attempt mutex")
            .push(email.to.clone());

        if let Some(delay) = self.delays.get(&email.to) {
            tokio::time::sleep(*delay).await;
        }

        if let Some(error) = self.failures.get(&email.to) {
            return Err(error.clone());
        }

        self.delivered
            .lock()
            .expect("delivery mutex")
            .push(email.clone());
        Ok(())
    }
}

pub(super) fn build_service(transport: Arc<ScriptedTransport>) -> QuoteService {
    QuoteService::new(NotificationDispatcher::new(transport, ADMIN_ADDRESS))
}

#[derive(Default)]
pub(super) struct MemorySettings {
    settings: Mutex<Option<PricingSettings>>,
}

impl PricingSettingsRepository for MemorySettings {
    fn current(&self) -> Result<PricingSettings, PricingSettingsError> {
        Ok(self
            .settings
            .lock()
            .expect("settings mutex")
            .unwrap_or_default())
    }

    fn replace(&self, settings: PricingSettings) -> Result<(), PricingSettingsError> {
        *self.settings.lock().expect("settings mutex") = Some(settings);
        Ok(())
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("body readable");
    serde_json::from_slice(&body).expect("json body")
}
