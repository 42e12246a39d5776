use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::domain::{InvalidQuote, QuoteRequest, QuoteSubmission};
use super::notification::{NotificationDispatcher, NotificationError};
use super::pricing::{compute_breakdown, CostBreakdown};

/// Result of a fully delivered quote.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteReceipt {
    pub breakdown: CostBreakdown,
    pub quoted_at: DateTime<Utc>,
}

/// Service composing validation, pricing, and notification dispatch.
pub struct QuoteService {
    dispatcher: NotificationDispatcher,
}

impl QuoteService {
    pub fn new(dispatcher: NotificationDispatcher) -> Self {
        Self { dispatcher }
    }

    /// Validate and price without sending anything.
    pub fn estimate(&self, submission: QuoteSubmission) -> Result<CostBreakdown, InvalidQuote> {
        let request = submission.validate()?;
        Ok(compute_breakdown(&request))
    }

    /// Validate, price, and notify both parties.
    ///
    /// Invalid submissions are rejected before any mail is attempted.
    pub async fn submit_quote(
        &self,
        submission: QuoteSubmission,
    ) -> Result<QuoteReceipt, QuoteServiceError> {
        let request = submission.validate().map_err(|err| {
            warn!(error = %err, "quote submission rejected");
            err
        })?;
        self.submit_request(&request).await
    }

    /// Price an already validated request and notify both parties.
    pub async fn submit_request(
        &self,
        request: &QuoteRequest,
    ) -> Result<QuoteReceipt, QuoteServiceError> {
        let breakdown = compute_breakdown(request);
        info!(
            client = request.client_name(),
            city = %request.city(),
            cleaning_type = %request.cleaning_type(),
            total_cost = breakdown.total_cost(),
            "quote priced"
        );

        match self.dispatcher.dispatch(request, &breakdown).await {
            Ok(()) => Ok(QuoteReceipt {
                breakdown,
                quoted_at: Utc::now(),
            }),
            Err(error) => Err(QuoteServiceError::Notification { breakdown, error }),
        }
    }
}

/// Error raised by the quote service.
#[derive(Debug, thiserror::Error)]
pub enum QuoteServiceError {
    #[error(transparent)]
    InvalidInput(#[from] InvalidQuote),
    /// The price is valid; at least one confirmation email did not go out.
    #[error("quote priced but not confirmed: {error}")]
    Notification {
        breakdown: CostBreakdown,
        #[source]
        error: NotificationError,
    },
}

impl QuoteServiceError {
    /// The computed breakdown, when pricing got that far.
    pub fn breakdown(&self) -> Option<&CostBreakdown> {
        match self {
            Self::InvalidInput(_) => None,
            Self::Notification { breakdown, .. } => Some(breakdown),
        }
    }
}
