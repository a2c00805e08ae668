// Runtime configuration for the booking gateway
// Values come from the process environment (optionally seeded from a .env file)

use rust_decimal::Decimal;
use std::str::FromStr;
use std::time::Duration;

use crate::booking::{CLEANING_FEE, HORIZON_DAYS};

/// Errors raised while loading configuration
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set in environment")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Gateway configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Base URL of the remote REST API (bookings, rooms)
    pub booking_api_url: String,
    pub jwt_secret: String,
    pub cleaning_fee: Decimal,
    pub horizon_days: u32,
    pub directory_cache_ttl: Duration,
    pub listing_cache_ttl: Duration,
    pub session_idle_ttl: Duration,
}

impl AppConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    ///
    /// `from_env` delegates here; tests pass a map instead of mutating the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "PORT", 8080)?,
            booking_api_url: required("BOOKING_API_URL")?
                .trim_end_matches('/')
                .to_string(),
            jwt_secret: required("JWT_SECRET")?,
            cleaning_fee: parse_or(&lookup, "CLEANING_FEE", CLEANING_FEE)?,
            horizon_days: parse_or(&lookup, "BOOKING_HORIZON_DAYS", HORIZON_DAYS)?,
            directory_cache_ttl: Duration::from_secs(parse_or(
                &lookup,
                "DIRECTORY_CACHE_TTL_SECS",
                30,
            )?),
            listing_cache_ttl: Duration::from_secs(parse_or(
                &lookup,
                "LISTING_CACHE_TTL_SECS",
                30,
            )?),
            session_idle_ttl: Duration::from_secs(parse_or(
                &lookup,
                "SESSION_IDLE_TTL_SECS",
                3600,
            )?),
        })
    }

    /// Socket address string the server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
    }
}
