//! Admin pricing settings.
//!
//! Rates and frequency discounts are validated and stored for the admin
//! dashboard only. [`compute_breakdown`](super::pricing::compute_breakdown)
//! does not read them.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingSettings {
    pub basic_rate: f64,
    pub deep_rate: f64,
    pub specialized_rate: f64,
    pub daily_discount: f64,
    pub weekly_discount: f64,
    pub monthly_discount: f64,
}

impl Default for PricingSettings {
    fn default() -> Self {
        Self {
            basic_rate: 0.1,
            deep_rate: 0.15,
            specialized_rate: 0.2,
            daily_discount: 10.0,
            weekly_discount: 5.0,
            monthly_discount: 2.0,
        }
    }
}

impl PricingSettings {
    pub fn validate(&self) -> Result<(), PricingSettingsError> {
        for (field, rate) in [
            ("basicRate", self.basic_rate),
            ("deepRate", self.deep_rate),
            ("specializedRate", self.specialized_rate),
        ] {
            if !(rate.is_finite() && rate >= 0.0) {
                return Err(PricingSettingsError::InvalidRate { field });
            }
        }

        for (field, discount) in [
            ("dailyDiscount", self.daily_discount),
            ("weeklyDiscount", self.weekly_discount),
            ("monthlyDiscount", self.monthly_discount),
        ] {
            if !(0.0..=100.0).contains(&discount) {
                return Err(PricingSettingsError::InvalidDiscount { field });
            }
        }

        Ok(())
    }
}

/// Storage abstraction for the admin settings.
pub trait PricingSettingsRepository: Send + Sync {
    fn current(&self) -> Result<PricingSettings, PricingSettingsError>;
    fn replace(&self, settings: PricingSettings) -> Result<(), PricingSettingsError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PricingSettingsError {
    #[error("{field} must be a non-negative rate")]
    InvalidRate { field: &'static str },
    #[error("{field} must be between 0 and 100")]
    InvalidDiscount { field: &'static str },
    #[error("pricing settings unavailable: {0}")]
    Unavailable(String),
}

pub fn pricing_settings_router<R>(repository: Arc<R>) -> Router
where
    R: PricingSettingsRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/admin/pricing",
            get(current_handler::<R>).put(update_handler::<R>),
        )
        .with_state(repository)
}

pub(crate) async fn current_handler<R>(
    State(repository): State<Arc<R>>,
) -> Result<Json<PricingSettings>, AppError>
where
    R: PricingSettingsRepository + 'static,
{
    Ok(Json(repository.current()?))
}

pub(crate) async fn update_handler<R>(
    State(repository): State<Arc<R>>,
    Json(settings): Json<PricingSettings>,
) -> Result<Json<serde_json::Value>, AppError>
where
    R: PricingSettingsRepository + 'static,
{
    settings.validate()?;
    repository.replace(settings)?;
    info!(?settings, "pricing settings updated");
    Ok(Json(json!({
        "message": "Pricing updated successfully!",
        "settings": settings,
    })))
}
