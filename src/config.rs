// Environment-driven configuration for the booking intake service

use anyhow::{Context, Result};
use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

// SMTP connection settings consumed by the embedding application's transport
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub smtp: SmtpConfig,
    /// Display name used for the From header of outgoing mail.
    pub hotel_name: String,
    /// Address receiving the internal new-booking notification; also shown as
    /// the support contact in failure responses.
    pub hotel_email: String,
    pub sender_email: String,
    pub support_phone: String,
    pub allowed_origins: Vec<String>,
    pub rate_limit_window_secs: u64,
    pub max_booking_attempts: usize,
    /// Upper bound for a single transport send; exceeding it surfaces as a
    /// Timeout failure instead of hanging the request.
    pub send_timeout_ms: u64,
    pub port: u16,
    pub environment: Environment,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            smtp: SmtpConfig {
                host: "smtp.gmail.com".to_string(),
                port: 587,
                username: None,
                password: None,
            },
            hotel_name: "Hotel Boss".to_string(),
            hotel_email: "support@hoteleurope.com".to_string(),
            sender_email: "info@hoteleurope.com".to_string(),
            support_phone: "+1 (555) 123-4567".to_string(),
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
                "http://localhost:8080".to_string(),
            ],
            rate_limit_window_secs: 15 * 60,
            max_booking_attempts: 5,
            send_timeout_ms: 10_000,
            port: 5000,
            environment: Environment::Development,
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment, falling back to the
    /// defaults above for anything unset.
    pub fn from_env() -> Result<Self> {
        let defaults = AppConfig::default();

        let username = env::var("SMTP_USER").ok().filter(|v| !v.is_empty());
        let sender_email = env::var("SENDER_EMAIL")
            .ok()
            .or_else(|| username.clone())
            .unwrap_or(defaults.sender_email);

        Ok(Self {
            smtp: SmtpConfig {
                host: env::var("SMTP_HOST").unwrap_or(defaults.smtp.host),
                port: parse_var("SMTP_PORT", defaults.smtp.port)?,
                username,
                password: env::var("SMTP_PASS").ok().filter(|v| !v.is_empty()),
            },
            hotel_name: env::var("HOTEL_NAME").unwrap_or(defaults.hotel_name),
            hotel_email: env::var("HOTEL_EMAIL").unwrap_or(defaults.hotel_email),
            sender_email,
            support_phone: env::var("SUPPORT_PHONE").unwrap_or(defaults.support_phone),
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or(defaults.allowed_origins),
            rate_limit_window_secs: parse_var(
                "RATE_LIMIT_WINDOW",
                defaults.rate_limit_window_secs,
            )?,
            max_booking_attempts: parse_var(
                "MAX_BOOKING_ATTEMPTS",
                defaults.max_booking_attempts,
            )?,
            send_timeout_ms: parse_var("SEND_TIMEOUT_MS", defaults.send_timeout_ms)?,
            port: parse_var("PORT", defaults.port)?,
            environment: match env::var("APP_ENV").as_deref() {
                Ok("production") => Environment::Production,
                _ => Environment::Development,
            },
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("invalid value for {}: {}", name, raw)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_backend() {
        let config = AppConfig::default();
        assert_eq!(config.rate_limit_window_secs, 900);
        assert_eq!(config.max_booking_attempts, 5);
        assert_eq!(config.port, 5000);
        assert_eq!(config.hotel_name, "Hotel Boss");
        assert_eq!(config.environment, Environment::Development);
        assert!(!config.environment.is_production());
    }

    #[test]
    fn test_environment_labels() {
        assert_eq!(Environment::Development.as_str(), "development");
        assert_eq!(Environment::Production.as_str(), "production");
        assert!(Environment::Production.is_production());
    }
}
