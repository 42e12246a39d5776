use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Service areas with a travel surcharge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum City {
    Queens,
    Nassau,
}

impl City {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Queens => "Queens",
            Self::Nassau => "Nassau",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CleaningType {
    Basic,
    Deep,
    Specialized,
}

impl CleaningType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Deep => "deep",
            Self::Specialized => "specialized",
        }
    }
}

/// Requested cadence. Recorded on the quote but not priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceFrequency {
    Daily,
    Weekly,
    Monthly,
    OneTime,
}

impl ServiceFrequency {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::OneTime => "one-time",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdditionalService {
    Windows,
    Carpet,
    Disinfection,
}

impl AdditionalService {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::Carpet => "carpet",
            Self::Disinfection => "disinfection",
        }
    }
}

macro_rules! labelled_enum {
    ($ty:ident, $field:literal, [$($variant:ident),+ $(,)?]) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $ty {
            type Err = InvalidQuote;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                let trimmed = raw.trim();
                [$(Self::$variant),+]
                    .into_iter()
                    .find(|candidate| candidate.label().eq_ignore_ascii_case(trimmed))
                    .ok_or_else(|| InvalidQuote::UnknownValue {
                        field: $field,
                        value: trimmed.to_string(),
                    })
            }
        }
    };
}

labelled_enum!(City, "city", [Queens, Nassau]);
labelled_enum!(CleaningType, "cleaningType", [Basic, Deep, Specialized]);
labelled_enum!(
    ServiceFrequency,
    "serviceFrequency",
    [Daily, Weekly, Monthly, OneTime]
);
labelled_enum!(
    AdditionalService,
    "additionalServices",
    [Windows, Carpet, Disinfection]
);

/// Raw quote form as submitted by a client, prior to validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuoteSubmission {
    pub client_name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub property_size: f64,
    pub cleaning_type: String,
    pub service_frequency: String,
    pub additional_services: Option<Vec<String>>,
}

impl QuoteSubmission {
    /// Check every field and produce an immutable [`QuoteRequest`].
    pub fn validate(self) -> Result<QuoteRequest, InvalidQuote> {
        let client_name = required("clientName", self.client_name)?;
        let email = required("email", self.email)?;
        if email.parse::<lettre::Address>().is_err() {
            return Err(InvalidQuote::InvalidEmail(email));
        }
        let address = required("address", self.address)?;

        let city = self.city.parse::<City>()?;
        if !(self.property_size.is_finite() && self.property_size > 0.0) {
            return Err(InvalidQuote::NonPositiveSize(self.property_size));
        }
        let cleaning_type = self.cleaning_type.parse::<CleaningType>()?;
        let service_frequency = self.service_frequency.parse::<ServiceFrequency>()?;

        let mut additional_services = Vec::new();
        for raw in self.additional_services.unwrap_or_default() {
            let service = raw.parse::<AdditionalService>()?;
            if !additional_services.contains(&service) {
                additional_services.push(service);
            }
        }

        Ok(QuoteRequest {
            client_name,
            email,
            address,
            city,
            property_size: self.property_size,
            cleaning_type,
            service_frequency,
            additional_services,
        })
    }
}

fn required(field: &'static str, value: String) -> Result<String, InvalidQuote> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(InvalidQuote::MissingField(field))
    } else {
        Ok(trimmed.to_string())
    }
}

/// A validated quote request. Only obtainable through [`QuoteSubmission::validate`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    client_name: String,
    email: String,
    address: String,
    city: City,
    property_size: f64,
    cleaning_type: CleaningType,
    service_frequency: ServiceFrequency,
    additional_services: Vec<AdditionalService>,
}

impl QuoteRequest {
    pub fn client_name(&self) -> &str {
        &self.client_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn city(&self) -> City {
        self.city
    }

    /// Square feet; always finite and greater than zero.
    pub fn property_size(&self) -> f64 {
        self.property_size
    }

    pub fn cleaning_type(&self) -> CleaningType {
        self.cleaning_type
    }

    pub fn service_frequency(&self) -> ServiceFrequency {
        self.service_frequency
    }

    pub fn additional_services(&self) -> &[AdditionalService] {
        &self.additional_services
    }
}

/// A submitted field violates its declared constraint.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidQuote {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),
    #[error("propertySize must be greater than 0 square feet (got {0})")]
    NonPositiveSize(f64),
    #[error("unsupported {field} '{value}'")]
    UnknownValue { field: &'static str, value: String },
}
