use async_trait::async_trait;
use tracing::info;

use super::{MailTransport, OutboundEmail, TransportError};

/// Development transport: records the envelope in the log and reports success.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMailTransport;

#[async_trait]
impl MailTransport for LogMailTransport {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn send(&self, email: &OutboundEmail) -> Result<(), TransportError> {
        info!(
            to = %email.to,
            subject = %email.subject,
            body_bytes = email.text.len(),
            "mail not delivered (log backend)"
        );
        Ok(())
    }
}
