//! Cleaning quote intake, pricing, and notification.

pub mod domain;
pub mod notification;
pub mod pricing;
pub mod router;
pub mod service;
pub mod settings;

#[cfg(test)]
mod tests;

pub use domain::{
    AdditionalService, City, CleaningType, InvalidQuote, QuoteRequest, QuoteSubmission,
    ServiceFrequency,
};
pub use notification::{
    format_admin_body, format_customer_body, NotificationDispatcher, NotificationError,
    NotificationFailure, NotificationKind, QuoteNotification,
};
pub use pricing::{compute_breakdown, CostBreakdown};
pub use router::quote_router;
pub use service::{QuoteReceipt, QuoteService, QuoteServiceError};
pub use settings::{
    pricing_settings_router, PricingSettings, PricingSettingsError, PricingSettingsRepository,
};
