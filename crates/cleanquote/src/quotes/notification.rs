//! Admin and customer quote emails.
//!
//! Body formatting is kept in pure functions so templates can be checked without
//! a transport. [`NotificationDispatcher::dispatch`] sends both messages
//! concurrently and waits for both outcomes before reporting.

use std::fmt::{self, Write as _};
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use super::domain::QuoteRequest;
use super::pricing::CostBreakdown;
use crate::mail::{MailTransport, OutboundEmail, TransportError};

pub const CUSTOMER_SUBJECT: &str = "Your CleanQuote Cleaning Service Quote";
pub const CONTACT_EMAIL: &str = "info@cleanquote.com";
pub const CONTACT_PHONE: &str = "(555) 123-4567";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Admin,
    Customer,
}

impl NotificationKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Customer => "customer",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A formatted email tagged with its audience.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteNotification {
    pub kind: NotificationKind,
    pub email: OutboundEmail,
}

pub fn admin_subject(request: &QuoteRequest) -> String {
    format!("New Cleaning Quote Request - {}", request.client_name())
}

fn dollars(amount: f64) -> String {
    format!("${amount:.2}")
}

/// Full dump of the request and every cost component.
pub fn format_admin_body(request: &QuoteRequest, breakdown: &CostBreakdown) -> String {
    let services = if request.additional_services().is_empty() {
        "None".to_string()
    } else {
        request
            .additional_services()
            .iter()
            .map(|service| service.label())
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut body = String::new();
    writeln!(&mut body, "New quote request details:\n").expect("write heading");
    writeln!(&mut body, "Client Information:\n-------------------").expect("write client heading");
    writeln!(&mut body, "Client Name: {}", request.client_name()).expect("write client name");
    writeln!(&mut body, "Email: {}", request.email()).expect("write email");
    writeln!(&mut body, "Address: {}", request.address()).expect("write address");
    writeln!(&mut body, "City: {}\n", request.city()).expect("write city");

    writeln!(&mut body, "Quote Details:\n--------------").expect("write details heading");
    writeln!(&mut body, "Property Size: {} sq ft", request.property_size()).expect("write size");
    writeln!(&mut body, "Cleaning Type: {}", request.cleaning_type()).expect("write cleaning type");
    writeln!(
        &mut body,
        "Service Frequency: {}",
        request.service_frequency()
    )
    .expect("write frequency");
    writeln!(&mut body, "Additional Services: {services}\n").expect("write services");

    writeln!(&mut body, "Quote Result:\n-------------").expect("write result heading");
    writeln!(&mut body, "Total Cost: {}\n", dollars(breakdown.total_cost())).expect("write total");
    writeln!(&mut body, "Breakdown:").expect("write breakdown heading");
    for (label, amount) in breakdown.components() {
        writeln!(&mut body, "  {label}: {}", dollars(amount)).expect("write component");
    }
    body.push('\n');
    writeln!(
        &mut body,
        "Please review this quote and follow up with the client as needed."
    )
    .expect("write closing");
    body
}

/// Short summary addressed to the client.
pub fn format_customer_body(request: &QuoteRequest, breakdown: &CostBreakdown) -> String {
    format!(
        "Dear {name},

Thank you for requesting a quote from CleanQuote. We're pleased to provide you with the following summary:

Quote Summary:
--------------
Total Cost: {total}
Property Size: {size} sq ft
Cleaning Type: {cleaning_type}
Service Frequency: {frequency}

We'd love the opportunity to discuss this quote with you in more detail and answer any questions you may have. Would you like to schedule a quick phone call to finalize your quote?

To set up an appointment, please click the link below or reply to this email with your preferred date and time:

[Schedule Appointment Link]

If you have any immediate questions, please don't hesitate to reach out to us at {contact_email} or call us at {contact_phone}.

We look forward to the possibility of serving you and keeping your space spotless!

Best regards,
The CleanQuote Team
",
        name = request.client_name(),
        total = dollars(breakdown.total_cost()),
        size = request.property_size(),
        cleaning_type = request.cleaning_type(),
        frequency = request.service_frequency(),
        contact_email = CONTACT_EMAIL,
        contact_phone = CONTACT_PHONE,
    )
}

pub fn admin_notification(
    request: &QuoteRequest,
    breakdown: &CostBreakdown,
    admin_address: &str,
) -> QuoteNotification {
    QuoteNotification {
        kind: NotificationKind::Admin,
        email: OutboundEmail {
            to: admin_address.to_string(),
            subject: admin_subject(request),
            text: format_admin_body(request, breakdown),
        },
    }
}

pub fn customer_notification(request: &QuoteRequest, breakdown: &CostBreakdown) -> QuoteNotification {
    QuoteNotification {
        kind: NotificationKind::Customer,
        email: OutboundEmail {
            to: request.email().to_string(),
            subject: CUSTOMER_SUBJECT.to_string(),
            text: format_customer_body(request, breakdown),
        },
    }
}

/// Sends the admin and customer emails for a priced quote.
pub struct NotificationDispatcher {
    transport: Arc<dyn MailTransport>,
    admin_address: String,
}

impl NotificationDispatcher {
    pub fn new(transport: Arc<dyn MailTransport>, admin_address: impl Into<String>) -> Self {
        Self {
            transport,
            admin_address: admin_address.into(),
        }
    }

    /// Both sends run concurrently and are always awaited to completion; a
    /// failure on one never cancels the other. Succeeds only if both succeed.
    pub async fn dispatch(
        &self,
        request: &QuoteRequest,
        breakdown: &CostBreakdown,
    ) -> Result<(), NotificationError> {
        let admin = admin_notification(request, breakdown, &self.admin_address);
        let customer = customer_notification(request, breakdown);

        let (admin_outcome, customer_outcome) =
            tokio::join!(self.deliver(&admin), self.deliver(&customer));

        let failures: Vec<NotificationFailure> = [admin_outcome, customer_outcome]
            .into_iter()
            .filter_map(Result::err)
            .collect();

        if failures.is_empty() {
            Ok(())
        } else {
            Err(NotificationError { failures })
        }
    }

    async fn deliver(&self, notification: &QuoteNotification) -> Result<(), NotificationFailure> {
        match self.transport.send(&notification.email).await {
            Ok(()) => {
                info!(
                    kind = %notification.kind,
                    recipient = %notification.email.to,
                    transport = self.transport.name(),
                    "quote notification sent"
                );
                Ok(())
            }
            Err(source) => {
                warn!(
                    kind = %notification.kind,
                    recipient = %notification.email.to,
                    transport = self.transport.name(),
                    error = %source,
                    "quote notification failed"
                );
                Err(NotificationFailure {
                    kind: notification.kind,
                    recipient: notification.email.to.clone(),
                    source,
                })
            }
        }
    }
}

/// One email that did not go out.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} notification to {recipient} failed: {source}")]
pub struct NotificationFailure {
    pub kind: NotificationKind,
    pub recipient: String,
    pub source: TransportError,
}

/// At least one of the two quote emails failed. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationError {
    failures: Vec<NotificationFailure>,
}

impl NotificationError {
    pub fn failures(&self) -> &[NotificationFailure] {
        &self.failures
    }

    pub fn failed_kinds(&self) -> Vec<NotificationKind> {
        self.failures.iter().map(|failure| failure.kind).collect()
    }

    pub fn failed(&self, kind: NotificationKind) -> bool {
        self.failures.iter().any(|failure| failure.kind == kind)
    }

    /// Every failure was the transport being unreachable.
    pub fn transport_unavailable(&self) -> bool {
        self.failures
            .iter()
            .all(|failure| failure.source.is_unavailable())
    }
}

impl fmt::Display for NotificationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let details = self
            .failures
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "quote notification failed: {details}")
    }
}

impl std::error::Error for NotificationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.failures
            .first()
            .map(|failure| failure as &(dyn std::error::Error + 'static))
    }
}
