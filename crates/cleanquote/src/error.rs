use crate::config::ConfigError;
use crate::mail::TransportError;
use crate::quotes::{InvalidQuote, PricingSettingsError};
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Mail(TransportError),
    InvalidQuote(InvalidQuote),
    PricingSettings(PricingSettingsError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Mail(err) => write!(f, "mail transport error: {}", err),
            AppError::InvalidQuote(err) => write!(f, "invalid quote: {}", err),
            AppError::PricingSettings(err) => write!(f, "pricing settings error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Mail(err) => Some(err),
            AppError::InvalidQuote(err) => Some(err),
            AppError::PricingSettings(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::InvalidQuote(_)
            | AppError::PricingSettings(
                PricingSettingsError::InvalidRate { .. } | PricingSettingsError::InvalidDiscount { .. },
            ) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::PricingSettings(PricingSettingsError::Unavailable(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::Config(_) | AppError::Telemetry(_) | AppError::Io(_) | AppError::Mail(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<TransportError> for AppError {
    fn from(value: TransportError) -> Self {
        Self::Mail(value)
    }
}

impl From<InvalidQuote> for AppError {
    fn from(value: InvalidQuote) -> Self {
        Self::InvalidQuote(value)
    }
}

impl From<PricingSettingsError> for AppError {
    fn from(value: PricingSettingsError) -> Self {
        Self::PricingSettings(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_map_to_unprocessable_entity() {
        let response = AppError::from(InvalidQuote::MissingField("email")).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let response = AppError::from(PricingSettingsError::InvalidDiscount {
            field: "dailyDiscount",
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn infrastructure_errors_map_to_server_errors() {
        let response =
            AppError::from(TransportError::Unavailable("refused".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response =
            AppError::from(PricingSettingsError::Unavailable("lock poisoned".to_string()))
                .into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
