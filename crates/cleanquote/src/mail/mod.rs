//! Outbound mail delivery.
//!
//! Quote notifications only ever see the [`MailTransport`] trait. The backend
//! is chosen at startup from [`MailConfig`]: an HTTP relay, a direct SMTP
//! connection, or the log-only development transport.

mod logging;
mod relay;
pub mod router;
mod smtp;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::{MailBackend, MailConfig};

pub use logging::LogMailTransport;
pub use relay::HttpRelayTransport;
pub use router::relay_router;
pub use smtp::SmtpMailTransport;

/// A single plain-text message; also the relay wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub text: String,
}

/// Single-shot delivery of one message.
#[async_trait]
pub trait MailTransport: Send + Sync {
    fn name(&self) -> &'static str;

    async fn send(&self, email: &OutboundEmail) -> Result<(), TransportError>;
}

/// Failure reported by a transport. Not interpreted beyond this split.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("mail transport rejected the message: {0}")]
    Rejected(String),
    #[error("mail transport unavailable: {0}")]
    Unavailable(String),
    #[error("message could not be built: {0}")]
    InvalidMessage(String),
    #[error("mail transport misconfigured: {0}")]
    Misconfigured(String),
}

impl TransportError {
    /// The collaborator could not be reached at all.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// Build the transport selected by configuration.
pub fn transport_from_config(config: &MailConfig) -> Result<Arc<dyn MailTransport>, TransportError> {
    let timeout = Duration::from_secs(config.timeout_secs);
    let transport: Arc<dyn MailTransport> = match &config.backend {
        MailBackend::Relay { endpoint } => Arc::new(HttpRelayTransport::new(endpoint, timeout)?),
        MailBackend::Smtp(settings) => Arc::new(SmtpMailTransport::new(settings, timeout)?),
        MailBackend::Log => Arc::new(LogMailTransport),
    };
    Ok(transport)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SmtpSettings;

    fn mail_config(backend: MailBackend) -> MailConfig {
        MailConfig {
            backend,
            admin_address: "admin@cleanquote.com".to_string(),
            timeout_secs: 5,
        }
    }

    #[test]
    fn builds_transport_per_backend() {
        let log = transport_from_config(&mail_config(MailBackend::Log)).expect("log transport");
        assert_eq!(log.name(), "log");

        let relay = transport_from_config(&mail_config(MailBackend::Relay {
            endpoint: "http://127.0.0.1:3001/api/send-email".to_string(),
        }))
        .expect("relay transport");
        assert_eq!(relay.name(), "relay");
    }

    #[tokio::test]
    async fn smtp_backend_rejects_malformed_sender() {
        let settings = SmtpSettings {
            host: "smtp.example.com".to_string(),
            port: 587,
            username: String::new(),
            password: String::new(),
            starttls: true,
            from: "not a mailbox".to_string(),
        };
        let result = transport_from_config(&mail_config(MailBackend::Smtp(settings)));
        assert!(matches!(result, Err(TransportError::InvalidMessage(_))));
    }

    #[test]
    fn only_unreachable_errors_count_as_unavailable() {
        assert!(TransportError::Unavailable("connection refused".into()).is_unavailable());
        assert!(!TransportError::Rejected("550 mailbox unavailable".into()).is_unavailable());
        assert!(!TransportError::InvalidMessage("bad recipient".into()).is_unavailable());
        assert!(!TransportError::Misconfigured("invalid relay endpoint".into()).is_unavailable());
    }
}
