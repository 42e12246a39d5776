use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub mail: MailConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let log_format = LogFormat::parse(
            &env::var("APP_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string()),
        )?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                log_format,
            },
            mail: MailConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "compact" | "text" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::InvalidLogFormat(other.to_string())),
        }
    }
}

/// Outbound mail settings shared by every transport backend.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub backend: MailBackend,
    pub admin_address: String,
    pub timeout_secs: u64,
}

/// Which collaborator actually delivers quote notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailBackend {
    /// POST `{to, subject, text}` to an HTTP relay endpoint.
    Relay { endpoint: String },
    /// Deliver directly through an SMTP server.
    Smtp(SmtpSettings),
    /// Write each message to the log; nothing leaves the process.
    Log,
}

impl MailBackend {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Relay { .. } => "relay",
            Self::Smtp(_) => "smtp",
            Self::Log => "log",
        }
    }

    /// Whether this process delivers mail itself and may serve as a relay.
    pub const fn delivers_locally(&self) -> bool {
        !matches!(self, Self::Relay { .. })
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub starttls: bool,
    pub from: String,
}

impl fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"[redacted]")
            .field("starttls", &self.starttls)
            .field("from", &self.from)
            .finish()
    }
}

pub const DEFAULT_ADMIN_ADDRESS: &str = "admin@cleanquote.com";
pub const DEFAULT_RELAY_URL: &str = "http://127.0.0.1:3001/api/send-email";
pub const DEFAULT_SENDER: &str = "CleanQuote <quotes@cleanquote.com>";

impl MailConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let backend = match env::var("MAIL_BACKEND")
            .unwrap_or_else(|_| "log".to_string())
            .trim()
            .to_ascii_lowercase()
            .as_str()
        {
            "log" | "" => MailBackend::Log,
            "relay" | "http" => {
                let endpoint =
                    env::var("MAIL_RELAY_URL").unwrap_or_else(|_| DEFAULT_RELAY_URL.to_string());
                if reqwest::Url::parse(endpoint.trim()).is_err() {
                    return Err(ConfigError::InvalidUrl {
                        var: "MAIL_RELAY_URL",
                        value: endpoint,
                    });
                }
                MailBackend::Relay {
                    endpoint: endpoint.trim().to_string(),
                }
            }
            "smtp" => MailBackend::Smtp(SmtpSettings::from_env()?),
            other => return Err(ConfigError::InvalidMailBackend(other.to_string())),
        };

        let admin_address = Self::admin_address_from_env()?;

        let timeout_secs = parse_number::<u64>("MAIL_TIMEOUT_SECS", "10")?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidNumber("MAIL_TIMEOUT_SECS"));
        }

        Ok(Self {
            backend,
            admin_address,
            timeout_secs,
        })
    }

    /// `MAIL_ADMIN_ADDRESS`, falling back to [`DEFAULT_ADMIN_ADDRESS`].
    pub fn admin_address_from_env() -> Result<String, ConfigError> {
        let admin_address = env::var("MAIL_ADMIN_ADDRESS")
            .unwrap_or_else(|_| DEFAULT_ADMIN_ADDRESS.to_string())
            .trim()
            .to_string();
        if admin_address.is_empty() {
            return Err(ConfigError::Missing("MAIL_ADMIN_ADDRESS"));
        }
        if admin_address.parse::<lettre::Address>().is_err() {
            return Err(ConfigError::InvalidAddress {
                var: "MAIL_ADMIN_ADDRESS",
                value: admin_address,
            });
        }
        Ok(admin_address)
    }
}

impl SmtpSettings {
    fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("SMTP_HOST")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::Missing("SMTP_HOST"))?;
        let port = parse_number::<u16>("SMTP_PORT", "587")?;
        let starttls = env::var("SMTP_STARTTLS")
            .map(|value| {
                !matches!(
                    value.trim().to_ascii_lowercase().as_str(),
                    "false" | "0" | "no" | "off"
                )
            })
            .unwrap_or(true);

        Ok(Self {
            host,
            port,
            username: env::var("SMTP_USERNAME").unwrap_or_default(),
            password: env::var("SMTP_PASSWORD").unwrap_or_default(),
            starttls,
            from: env::var("MAIL_FROM").unwrap_or_else(|_| DEFAULT_SENDER.to_string()),
        })
    }
}

fn parse_number<T: std::str::FromStr>(var: &'static str, default: &str) -> Result<T, ConfigError> {
    env::var(var)
        .unwrap_or_else(|_| default.to_string())
        .trim()
        .parse::<T>()
        .map_err(|_| ConfigError::InvalidNumber(var))
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidLogFormat(String),
    InvalidMailBackend(String),
    InvalidNumber(&'static str),
    InvalidAddress { var: &'static str, value: String },
    InvalidUrl { var: &'static str, value: String },
    Missing(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidLogFormat(value) => {
                write!(f, "APP_LOG_FORMAT '{value}' is not one of compact, json")
            }
            ConfigError::InvalidMailBackend(value) => {
                write!(f, "MAIL_BACKEND '{value}' is not one of relay, smtp, log")
            }
            ConfigError::InvalidNumber(var) => write!(f, "{var} must be a positive number"),
            ConfigError::InvalidAddress { var, value } => {
                write!(f, "{var} '{value}' is not a valid email address")
            }
            ConfigError::InvalidUrl { var, value } => {
                write!(f, "{var} '{value}' is not an absolute URL")
            }
            ConfigError::Missing(var) => write!(f, "{var} must be set"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
