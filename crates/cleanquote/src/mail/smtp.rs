use std::time::Duration;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{error, info};

use super::{MailTransport, OutboundEmail, TransportError};
use crate::config::SmtpSettings;

/// Delivers messages directly through an SMTP server.
pub struct SmtpMailTransport {
    from: Mailbox,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailTransport {
    pub fn new(settings: &SmtpSettings, timeout: Duration) -> Result<Self, TransportError> {
        let from: Mailbox = settings.from.parse().map_err(|err| {
            TransportError::InvalidMessage(format!("invalid sender '{}': {err}", settings.from))
        })?;

        let builder = if settings.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
        }
        .map_err(|err| TransportError::Misconfigured(format!("TLS configuration error: {err}")))?;

        let mut builder = builder.port(settings.port).timeout(Some(timeout));
        if !settings.username.is_empty() && !settings.password.is_empty() {
            builder = builder.credentials(Credentials::new(
                settings.username.clone(),
                settings.password.clone(),
            ));
        }

        info!(host = %settings.host, port = settings.port, starttls = settings.starttls, "smtp transport configured");
        Ok(Self {
            from,
            transport: builder.build(),
        })
    }

    fn build_message(&self, email: &OutboundEmail) -> Result<Message, TransportError> {
        let to: Mailbox = email.to.parse().map_err(|err| {
            TransportError::InvalidMessage(format!("invalid recipient '{}': {err}", email.to))
        })?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(email.text.clone())
            .map_err(|err| TransportError::InvalidMessage(err.to_string()))
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    fn name(&self) -> &'static str {
        "smtp"
    }

    async fn send(&self, email: &OutboundEmail) -> Result<(), TransportError> {
        let message = self.build_message(email)?;

        self.transport.send(message).await.map(|_| ()).map_err(|err| {
            error!(to = %email.to, error = %err, "smtp delivery failed");
            if err.is_permanent() {
                TransportError::Rejected(err.to_string())
            } else {
                TransportError::Unavailable(err.to_string())
            }
        })
    }
}
