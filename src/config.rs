//! Environment-driven configuration
//!
//! Values are read once at startup, validated together, and handed to the
//! composition root. Every violation is reported in a single error so a
//! misconfigured deployment can be fixed in one pass.

use std::env;
use std::net::IpAddr;
use std::time::Duration;

use sqlx::postgres::PgSslMode;
use thiserror::Error;

use crate::security::password::DEFAULT_BCRYPT_COST;

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration validation failed: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// Host and port to bind; host names are resolved by the listener
    pub fn bind_target(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }
}

/// PostgreSQL connection settings
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub ssl_mode: PgSslMode,
    pub max_connections: u32,
    pub query_timeout: Duration,
}

/// Logging settings consumed by [`crate::telemetry::init`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub debug: bool,
    pub json: bool,
}

/// Validated application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub log: LogConfig,
    pub bcrypt_cost: u32,
}

impl Config {
    /// Loads configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration from an arbitrary key lookup
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());
        let mut errors = Vec::new();

        let host = get("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        if !is_valid_host(&host) {
            errors.push(format!("HOST must be an IP address or host name, got '{host}'"));
        }
        let port = parse_or(&get, "PORT", 8080u16, &mut errors);

        let db_host = get("DB_HOST").unwrap_or_else(|| "localhost".to_string());
        let db_port = parse_or(&get, "DB_PORT", 5432u16, &mut errors);
        let user = required(&get, "DB_USER", &mut errors);
        let password = required(&get, "DB_PASSWORD", &mut errors);
        let name = required(&get, "DB_NAME", &mut errors);
        let ssl_mode = parse_ssl_mode(get("DB_SSLMODE").as_deref(), &mut errors);

        let max_connections = parse_or(&get, "DB_MAX_CONNECTIONS", 5u32, &mut errors);
        if max_connections == 0 {
            errors.push("DB_MAX_CONNECTIONS must be greater than zero".to_string());
        }
        let query_timeout_secs = parse_or(&get, "DB_QUERY_TIMEOUT_SECS", 5u64, &mut errors);
        if query_timeout_secs == 0 {
            errors.push("DB_QUERY_TIMEOUT_SECS must be greater than zero".to_string());
        }

        let bcrypt_cost = parse_or(&get, "BCRYPT_COST", DEFAULT_BCRYPT_COST, &mut errors);
        if !(4..=31).contains(&bcrypt_cost) {
            errors.push("BCRYPT_COST must be between 4 and 31".to_string());
        }

        let debug = get("DEBUG").is_some_and(|value| value.eq_ignore_ascii_case("true"));
        let json = get("LOG_FORMAT").is_some_and(|value| value.eq_ignore_ascii_case("json"));

        if !errors.is_empty() {
            return Err(ConfigError::Invalid(errors));
        }

        Ok(Self {
            server: ServerConfig { host, port },
            database: DatabaseConfig {
                host: db_host,
                port: db_port,
                user,
                password,
                name,
                ssl_mode,
                max_connections,
                query_timeout: Duration::from_secs(query_timeout_secs),
            },
            log: LogConfig { debug, json },
            bcrypt_cost,
        })
    }
}

fn required<F>(get: &F, key: &str, errors: &mut Vec<String>) -> String
where
    F: Fn(&str) -> Option<String>,
{
    get(key).unwrap_or_else(|| {
        errors.push(format!("{key} is required"));
        String::new()
    })
}

fn parse_or<F, T>(get: &F, key: &str, default: T, errors: &mut Vec<String>) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match get(key) {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            errors.push(format!("{key} must be a numeric value, got '{raw}'"));
            default
        }),
    }
}

/// IP literal (IPv6 without brackets) or RFC 1123 host name
fn is_valid_host(host: &str) -> bool {
    if host.parse::<IpAddr>().is_ok() {
        return true;
    }

    host.len() <= 253
        && host.split('.').all(|label| {
            !label.is_empty()
                && label.len() <= 63
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}

fn parse_ssl_mode(raw: Option<&str>, errors: &mut Vec<String>) -> PgSslMode {
    match raw.unwrap_or("disable") {
        "disable" => PgSslMode::Disable,
        "require" => PgSslMode::Require,
        "verify-ca" => PgSslMode::VerifyCa,
        "verify-full" => PgSslMode::VerifyFull,
        other => {
            errors.push(format!(
                "DB_SSLMODE must be one of disable, require, verify-ca, verify-full, got '{other}'"
            ));
            PgSslMode::Disable
        }
    }
}
