//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::{IpAddr, SocketAddr};

use contact_form_core::notifications::DEFAULT_ADMIN_EMAIL;
use lettre::Address;
use tracing::Level;

const DEFAULT_PORT: u16 = 4000;
const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub database_max_connections: u32,
    pub log_level: Level,
    pub smtp: SmtpConfig,
    pub admin_email: String,
    pub cors_allowed_origin: Option<String>,
}

/// Outgoing mail settings. The presence of `host` selects the custom SMTP profile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SmtpConfig {
    pub host: Option<String>,
    pub port: u16,
    pub secure: bool,
    pub user: Option<String>,
    pub password: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        // Empty values are treated as unset, like an unset variable in a `.env` file.
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        // --- Server and Database Settings ---
        let host = parse_or(&var, "BIND_HOST", IpAddr::from([0, 0, 0, 0]))?;
        let port = parse_or(&var, "PORT", DEFAULT_PORT)?;
        let bind_address = SocketAddr::new(host, port);

        let database_url =
            var("DATABASE_URL").ok_or_else(|| ConfigError::MissingVar("DATABASE_URL".to_string()))?;
        let database_max_connections =
            parse_or(&var, "DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;

        let log_level_str = var("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Mail Settings ---
        let smtp = SmtpConfig {
            host: var("SMTP_HOST"),
            port: parse_or(&var, "SMTP_PORT", DEFAULT_SMTP_PORT)?,
            secure: var("SMTP_SECURE").is_some_and(|v| v == "true"),
            user: var("EMAIL_USER"),
            password: var("EMAIL_PASS"),
        };

        let admin_email = var("ADMIN_EMAIL").unwrap_or_else(|| DEFAULT_ADMIN_EMAIL.to_string());
        admin_email
            .parse::<Address>()
            .map_err(|e| ConfigError::InvalidValue("ADMIN_EMAIL".to_string(), e.to_string()))?;

        let cors_allowed_origin = var("CORS_ALLOWED_ORIGIN");

        Ok(Self {
            bind_address,
            database_url,
            database_max_connections,
            log_level,
            smtp,
            admin_email,
            cors_allowed_origin,
        })
    }
}

fn parse_or<T>(
    var: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match var(key) {
        Some(value) => value
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidValue(key.to_string(), e.to_string())),
        None => Ok(default),
    }
}
