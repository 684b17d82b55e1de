use std::env;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_LICENSE_URL: &str = "https://mit-license-generator.replit.app/license";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} must be a positive integer, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub bind_address: String,
    pub frontend_origin: String,
    pub license_url: String,
    pub license_path: String,
    pub license_refresh_interval: Duration,
    pub task_wipe_interval: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        Ok(Self {
            database_url: env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?,
            database_max_connections: parse_number("DATABASE_MAX_CONNECTIONS", 5)?,
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            frontend_origin: env::var("FRONTEND_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            license_url: env::var("LICENSE_URL").unwrap_or_else(|_| DEFAULT_LICENSE_URL.to_string()),
            license_path: env::var("LICENSE_PATH").unwrap_or_else(|_| "LICENSE.md".to_string()),
            license_refresh_interval: Duration::from_secs(parse_number(
                "LICENSE_REFRESH_INTERVAL_SECS",
                24 * 60 * 60,
            )?),
            task_wipe_interval: Duration::from_secs(parse_number("TASK_WIPE_INTERVAL_SECS", 60 * 60)?),
        })
    }
}

fn parse_number<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    match env::var(name) {
        Ok(value) => match value.trim().parse::<T>() {
            Ok(parsed) if parsed > T::default() => Ok(parsed),
            _ => Err(ConfigError::InvalidNumber { name, value }),
        },
        Err(_) => Ok(default),
    }
}
